use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use crate::{
    animation::smoothing::{Smoother, Smoothing},
    foundation::core::{Progress, Viewport},
    foundation::error::{StageError, StageResult},
    scroll::host::{ElementRef, EventKind, FrameId, HostEvent, ListenerGuard, ScrollHost, WeakHost},
    scroll::offset::ScrollOffset,
};

type Subscriber = Rc<dyn Fn(Progress)>;

struct SourceState {
    host: WeakHost,
    element: ElementRef,
    offset: ScrollOffset,
    raw: Progress,
    smoother: Option<Box<dyn Smoother>>,
    pending_frame: Option<FrameId>,
    last_emitted: Option<Progress>,
    subscribers: BTreeMap<u64, Subscriber>,
    next_sub: u64,
}

impl SourceState {
    fn compute_raw(&self, scroll_y: f64, viewport: Viewport) -> Progress {
        match self.element.get() {
            Some(rect) => self.offset.progress(scroll_y, rect, viewport),
            None => Progress::START,
        }
    }

    fn current(&self) -> Progress {
        match &self.smoother {
            Some(s) => Progress::new(s.value()),
            None => self.raw,
        }
    }
}

/// Tracks one element against the viewport and publishes its normalized scroll progress.
///
/// Owns one scroll and one resize listener on the host for as long as it lives. Dropping it (or
/// calling [`ScrollProgressSource::detach`]) releases both listeners and cancels any pending
/// smoothing frame before returning.
pub struct ScrollProgressSource {
    state: Rc<RefCell<SourceState>>,
    guards: Vec<ListenerGuard>,
}

impl ScrollProgressSource {
    pub fn attach(
        host: &ScrollHost,
        element: ElementRef,
        offset: ScrollOffset,
        smoothing: Option<Smoothing>,
    ) -> StageResult<Self> {
        let mut state = SourceState {
            host: host.downgrade(),
            element,
            offset,
            raw: Progress::START,
            smoother: None,
            pending_frame: None,
            last_emitted: None,
            subscribers: BTreeMap::new(),
            next_sub: 0,
        };
        state.raw = state.compute_raw(host.scroll_y(), host.viewport());
        if let Some(smoothing) = smoothing {
            state.smoother = Some(smoothing.build(state.raw.get())?);
        }
        state.last_emitted = Some(state.current());

        let state = Rc::new(RefCell::new(state));
        let on_scroll = {
            let weak = Rc::downgrade(&state);
            host.add_listener(EventKind::Scroll, move |event| on_event(&weak, event))
        };
        let on_resize = {
            let weak = Rc::downgrade(&state);
            host.add_listener(EventKind::Resize, move |event| on_event(&weak, event))
        };
        tracing::debug!(offset = ?offset, "scroll progress source attached");

        Ok(Self {
            state,
            guards: vec![on_scroll, on_resize],
        })
    }

    /// Current progress: smoothed when smoothing is configured, raw otherwise.
    pub fn progress(&self) -> Progress {
        self.state.borrow().current()
    }

    pub fn raw_progress(&self) -> Progress {
        self.state.borrow().raw
    }

    pub fn is_settled(&self) -> bool {
        let st = self.state.borrow();
        st.smoother.as_ref().is_none_or(|s| s.is_settled())
    }

    pub fn element(&self) -> ElementRef {
        self.state.borrow().element.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    /// Register `f` to receive every published progress change.
    pub fn subscribe(&self, f: impl Fn(Progress) + 'static) -> Subscription {
        let mut st = self.state.borrow_mut();
        st.next_sub += 1;
        let id = st.next_sub;
        st.subscribers.insert(id, Rc::new(f));
        Subscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Recompute from the host's current geometry (e.g. after the element is laid out).
    pub fn refresh(&self) -> StageResult<()> {
        let host = self
            .state
            .borrow()
            .host
            .upgrade()
            .ok_or_else(|| StageError::lifecycle("scroll host dropped before refresh"))?;
        let event = HostEvent {
            kind: EventKind::Resize,
            scroll_y: host.scroll_y(),
            viewport: host.viewport(),
        };
        on_event(&Rc::downgrade(&self.state), &event);
        Ok(())
    }

    /// Release listeners and pending frames. Equivalent to dropping the source.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for ScrollProgressSource {
    fn drop(&mut self) {
        self.guards.clear();
        let (host, pending) = {
            let mut st = self.state.borrow_mut();
            st.subscribers.clear();
            (st.host.upgrade(), st.pending_frame.take())
        };
        if let (Some(host), Some(id)) = (host, pending) {
            host.cancel_frame(id);
        }
        tracing::debug!("scroll progress source detached");
    }
}

fn on_event(weak: &Weak<RefCell<SourceState>>, event: &HostEvent) {
    let Some(state) = weak.upgrade() else {
        return;
    };

    let needs_frame = {
        let mut guard = state.borrow_mut();
        let st = &mut *guard;
        let raw = st.compute_raw(event.scroll_y, event.viewport);
        st.raw = raw;
        match st.smoother.as_mut() {
            Some(s) => {
                if event.kind == EventKind::Resize {
                    // Layout changed: recompute from scratch rather than animate toward it.
                    s.reset(raw.get());
                } else {
                    s.set_target(raw.get());
                }
                !s.is_settled() && st.pending_frame.is_none()
            }
            None => false,
        }
    };

    if needs_frame {
        schedule_frame(&state);
    }
    emit(&state);
}

fn schedule_frame(state: &Rc<RefCell<SourceState>>) {
    let Some(host) = state.borrow().host.upgrade() else {
        return;
    };
    let weak = Rc::downgrade(state);
    let id = host.request_frame(move |dt| on_frame(&weak, dt));
    state.borrow_mut().pending_frame = Some(id);
}

fn on_frame(weak: &Weak<RefCell<SourceState>>, dt_secs: f64) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let settled = {
        let mut st = state.borrow_mut();
        st.pending_frame = None;
        match st.smoother.as_mut() {
            Some(s) => {
                s.step(dt_secs);
                s.is_settled()
            }
            None => true,
        }
    };
    if !settled {
        schedule_frame(&state);
    }
    emit(&state);
}

fn emit(state: &Rc<RefCell<SourceState>>) {
    let (value, subscribers): (Progress, Vec<Subscriber>) = {
        let mut st = state.borrow_mut();
        let value = st.current();
        if st.last_emitted == Some(value) {
            return;
        }
        st.last_emitted = Some(value);
        (value, st.subscribers.values().cloned().collect())
    };
    for f in subscribers {
        f(value);
    }
}

/// Scoped subscriber registration; dropping it stops delivery.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    state: Weak<RefCell<SourceState>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().subscribers.remove(&self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/source.rs"]
mod tests;
