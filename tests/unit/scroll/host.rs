use super::*;

fn host() -> ScrollHost {
    ScrollHost::new(Viewport::new(1280.0, 800.0).unwrap())
}

#[test]
fn listeners_receive_matching_events_until_dropped() {
    let host = host();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let guard = host.add_listener(EventKind::Scroll, move |e| sink.borrow_mut().push(e.scroll_y));
    assert_eq!(host.listener_count(), 1);

    host.scroll_to(120.0);
    host.resize(Viewport::new(800.0, 600.0).unwrap());
    host.scroll_by(30.0);
    assert_eq!(*seen.borrow(), vec![120.0, 150.0]);

    drop(guard);
    assert_eq!(host.listener_count(), 0);
    host.scroll_to(999.0);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn scroll_is_clamped_at_zero() {
    let host = host();
    host.scroll_to(-50.0);
    assert_eq!(host.scroll_y(), 0.0);
    host.scroll_to(f64::NAN);
    assert_eq!(host.scroll_y(), 0.0);
}

#[test]
fn listener_removed_mid_dispatch_does_not_fire() {
    let host = host();
    let fired = Rc::new(Cell::new(0u32));
    let victim: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));

    let v = Rc::clone(&victim);
    let _killer = host.add_listener(EventKind::Scroll, move |_| {
        v.borrow_mut().take();
    });
    let f = Rc::clone(&fired);
    *victim.borrow_mut() = Some(host.add_listener(EventKind::Scroll, move |_| {
        f.set(f.get() + 1);
    }));

    host.scroll_to(10.0);
    assert_eq!(fired.get(), 0);
    assert_eq!(host.listener_count(), 1);
}

#[test]
fn frames_run_once_and_can_be_cancelled() {
    let host = host();
    let ticks = Rc::new(Cell::new(0.0));
    let t = Rc::clone(&ticks);
    host.request_frame(move |dt| t.set(t.get() + dt));
    let cancelled = host.request_frame(|_| panic!("cancelled frame ran"));
    assert_eq!(host.pending_frames(), 2);
    assert!(host.cancel_frame(cancelled));
    assert!(!host.cancel_frame(cancelled));

    assert_eq!(host.advance_frame(0.016), 1);
    assert_eq!(ticks.get(), 0.016);
    assert_eq!(host.advance_frame(0.016), 0);
    assert_eq!(host.pending_frames(), 0);
    assert!((host.clock_secs() - 0.032).abs() < 1e-12);
}

#[test]
fn frames_requested_during_a_frame_run_next_frame() {
    let host = host();
    let count = Rc::new(Cell::new(0u32));
    let h = host.clone();
    let c = Rc::clone(&count);
    host.request_frame(move |_| {
        c.set(c.get() + 1);
        let c2 = Rc::clone(&c);
        h.request_frame(move |_| c2.set(c2.get() + 1));
    });
    assert_eq!(host.advance_frame(0.016), 1);
    assert_eq!(count.get(), 1);
    assert_eq!(host.advance_frame(0.016), 1);
    assert_eq!(count.get(), 2);
}

#[test]
fn guard_outliving_host_is_harmless() {
    let host = host();
    let guard = host.add_listener(EventKind::Resize, |_| {});
    drop(host);
    drop(guard);
}

#[test]
fn element_ref_attach_detach() {
    let el = ElementRef::new();
    assert!(!el.is_attached());
    let shared = el.clone();
    el.attach(Rect::new(0.0, 10.0, 100.0, 110.0));
    assert_eq!(shared.get().map(|r| r.height()), Some(100.0));
    shared.detach();
    assert!(el.get().is_none());
}
