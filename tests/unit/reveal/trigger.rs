use super::*;

fn vp() -> Viewport {
    Viewport::new(1280.0, 800.0).unwrap()
}

fn element() -> Rect {
    Rect::new(0.0, 2000.0, 1280.0, 2400.0)
}

#[test]
fn once_latches_after_first_entry() {
    let mut trigger = InViewTrigger::new(true, 0.0);
    assert!(!trigger.observe(Some(element()), 0.0, vp(), 0.0));
    assert!(!trigger.is_in_view());

    assert!(trigger.observe(Some(element()), 1500.0, vp(), 1.0));
    assert_eq!(trigger.entered_at(), Some(1.0));

    // Scrolled back out: still latched, entry time unchanged.
    assert!(trigger.observe(Some(element()), 0.0, vp(), 2.0));
    assert_eq!(trigger.entered_at(), Some(1.0));
    assert_eq!(trigger.elapsed(3.5), Some(2.5));
}

#[test]
fn repeatable_trigger_follows_intersection() {
    let mut trigger = InViewTrigger::new(false, 0.0);
    assert!(trigger.observe(Some(element()), 1500.0, vp(), 1.0));
    assert!(trigger.observe(Some(element()), 1600.0, vp(), 2.0));
    assert_eq!(trigger.entered_at(), Some(1.0));
    assert!(!trigger.observe(Some(element()), 0.0, vp(), 3.0));
    assert_eq!(trigger.entered_at(), None);
    assert!(trigger.observe(Some(element()), 1500.0, vp(), 4.0));
    assert_eq!(trigger.entered_at(), Some(4.0));
}

#[test]
fn margin_shrinks_or_grows_viewport() {
    let shrunk = InViewTrigger::new(true, -100.0);
    let plain = InViewTrigger::new(true, 0.0);
    let grown = InViewTrigger::new(true, 100.0);
    let scroll_y = 1250.0; // viewport spans [1250, 2050]
    assert!(plain.intersects(element(), scroll_y, vp()));
    assert!(!shrunk.intersects(element(), scroll_y, vp()));
    assert!(grown.intersects(element(), 1150.0, vp()));
    assert!(!plain.intersects(element(), 1150.0, vp()));
}

#[test]
fn detached_element_never_enters() {
    let mut trigger = InViewTrigger::default();
    assert!(!trigger.observe(None, 2000.0, vp(), 0.0));
    assert_eq!(trigger.elapsed(1.0), None);
}

#[test]
fn reached_stays_true_below_the_element() {
    let trigger = InViewTrigger::new(true, 0.0);
    assert!(!trigger.reached(element(), 1000.0, vp()));
    assert!(trigger.reached(element(), 1500.0, vp()));
    assert!(trigger.reached(element(), 9000.0, vp()));
    assert!(!trigger.intersects(element(), 9000.0, vp()));
}
