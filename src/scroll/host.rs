//! A single-threaded scroll host: the window that owns scroll position, viewport size, event
//! listeners and animation-frame callbacks.
//!
//! Every callback runs on the caller's thread inside [`ScrollHost::scroll_to`],
//! [`ScrollHost::resize`] or [`ScrollHost::advance_frame`]. Listener and frame registrations are
//! scoped: dropping a [`ListenerGuard`] deregisters synchronously.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use crate::foundation::core::{Rect, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Scroll,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostEvent {
    pub kind: EventKind,
    pub scroll_y: f64,
    pub viewport: Viewport,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

type Listener = Rc<dyn Fn(&HostEvent)>;
type FrameCallback = Box<dyn FnOnce(f64)>;

struct HostState {
    scroll_y: f64,
    viewport: Viewport,
    clock_secs: f64,
    next_id: u64,
    listeners: BTreeMap<ListenerId, (EventKind, Listener)>,
    frames: BTreeMap<FrameId, FrameCallback>,
}

impl HostState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct ScrollHost {
    state: Rc<RefCell<HostState>>,
}

#[derive(Clone)]
pub struct WeakHost {
    state: Weak<RefCell<HostState>>,
}

impl WeakHost {
    pub fn upgrade(&self) -> Option<ScrollHost> {
        self.state.upgrade().map(|state| ScrollHost { state })
    }
}

impl ScrollHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                scroll_y: 0.0,
                viewport,
                clock_secs: 0.0,
                next_id: 0,
                listeners: BTreeMap::new(),
                frames: BTreeMap::new(),
            })),
        }
    }

    pub fn downgrade(&self) -> WeakHost {
        WeakHost {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    /// Seconds of frame time advanced so far.
    pub fn clock_secs(&self) -> f64 {
        self.state.borrow().clock_secs
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Scroll to `y` (clamped at 0) and dispatch a scroll event.
    pub fn scroll_to(&self, y: f64) {
        let y = if y.is_finite() { y.max(0.0) } else { 0.0 };
        self.state.borrow_mut().scroll_y = y;
        self.dispatch(EventKind::Scroll);
    }

    pub fn scroll_by(&self, dy: f64) {
        let y = self.scroll_y() + dy;
        self.scroll_to(y);
    }

    pub fn resize(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
        self.dispatch(EventKind::Resize);
    }

    fn dispatch(&self, kind: EventKind) {
        let (event, snapshot): (HostEvent, Vec<(ListenerId, Listener)>) = {
            let st = self.state.borrow();
            let event = HostEvent {
                kind,
                scroll_y: st.scroll_y,
                viewport: st.viewport,
            };
            let snapshot = st
                .listeners
                .iter()
                .filter(|(_, (k, _))| *k == kind)
                .map(|(id, (_, f))| (*id, Rc::clone(f)))
                .collect();
            (event, snapshot)
        };

        for (id, listener) in snapshot {
            // A listener removed by an earlier callback in this dispatch must not fire.
            if !self.state.borrow().listeners.contains_key(&id) {
                continue;
            }
            listener(&event);
        }
    }

    pub fn add_listener(&self, kind: EventKind, f: impl Fn(&HostEvent) + 'static) -> ListenerGuard {
        let mut st = self.state.borrow_mut();
        let id = ListenerId(st.next_id());
        st.listeners.insert(id, (kind, Rc::new(f)));
        tracing::debug!(?kind, id = id.0, "listener added");
        ListenerGuard {
            host: self.downgrade(),
            id,
        }
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.state.borrow_mut().listeners.remove(&id).is_some();
        if removed {
            tracing::debug!(id = id.0, "listener removed");
        }
        removed
    }

    /// Schedule `f` for the next [`ScrollHost::advance_frame`]; it receives the frame delta.
    pub fn request_frame(&self, f: impl FnOnce(f64) + 'static) -> FrameId {
        let mut st = self.state.borrow_mut();
        let id = FrameId(st.next_id());
        st.frames.insert(id, Box::new(f));
        id
    }

    pub fn cancel_frame(&self, id: FrameId) -> bool {
        self.state.borrow_mut().frames.remove(&id).is_some()
    }

    /// Advance the clock by `dt_secs` and run the callbacks that were pending when the frame
    /// started. Callbacks requested during the frame run on the next one. Returns how many ran.
    pub fn advance_frame(&self, dt_secs: f64) -> usize {
        let ids: Vec<FrameId> = {
            let mut st = self.state.borrow_mut();
            st.clock_secs += dt_secs;
            st.frames.keys().copied().collect()
        };

        let mut ran = 0;
        for id in ids {
            let Some(callback) = self.state.borrow_mut().frames.remove(&id) else {
                continue;
            };
            callback(dt_secs);
            ran += 1;
        }
        tracing::trace!(ran, "frame advanced");
        ran
    }
}

/// Scoped listener registration; dropping it deregisters the listener.
#[must_use = "dropping the guard deregisters the listener immediately"]
pub struct ListenerGuard {
    host: WeakHost,
    id: ListenerId,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(host) = self.host.upgrade() {
            host.remove_listener(self.id);
        }
    }
}

/// A shareable reference to an element's layout box in document coordinates.
///
/// Empty until the element is laid out; consumers treat an empty ref as "not yet mounted".
#[derive(Clone, Debug, Default)]
pub struct ElementRef {
    rect: Rc<Cell<Option<Rect>>>,
}

impl ElementRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(rect: Rect) -> Self {
        let r = Self::new();
        r.attach(rect);
        r
    }

    pub fn attach(&self, rect: Rect) {
        self.rect.set(Some(rect));
    }

    pub fn detach(&self) {
        self.rect.set(None);
    }

    pub fn get(&self) -> Option<Rect> {
        self.rect.get()
    }

    pub fn is_attached(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/host.rs"]
mod tests;
