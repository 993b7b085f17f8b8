use crate::foundation::core::{Rect, Viewport};

/// Latches when an element first intersects the viewport.
///
/// `margin_px` grows (positive) or shrinks (negative) the viewport box before the intersection
/// test, like an intersection-observer root margin. With `once`, visibility never resets after
/// the first hit.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InViewTrigger {
    pub once: bool,
    pub margin_px: f64,
    #[serde(skip)]
    entered_at: Option<f64>,
}

impl Default for InViewTrigger {
    fn default() -> Self {
        Self::new(true, 0.0)
    }
}

impl InViewTrigger {
    pub fn new(once: bool, margin_px: f64) -> Self {
        Self {
            once,
            margin_px,
            entered_at: None,
        }
    }

    /// Whether `element` intersects the margin-adjusted viewport at `scroll_y`.
    pub fn intersects(&self, element: Rect, scroll_y: f64, viewport: Viewport) -> bool {
        let top = scroll_y - self.margin_px;
        let bottom = scroll_y + viewport.height + self.margin_px;
        bottom > top && element.y1 > top && element.y0 < bottom
    }

    /// Whether a downward scroll from the top of the page to `scroll_y` has brought the element
    /// into the margin-adjusted viewport at some point.
    pub fn reached(&self, element: Rect, scroll_y: f64, viewport: Viewport) -> bool {
        element.y0 < scroll_y + viewport.height + self.margin_px
    }

    /// Update from the current geometry. A detached element never enters view. Returns whether
    /// the element counts as in view after the update.
    pub fn observe(
        &mut self,
        element: Option<Rect>,
        scroll_y: f64,
        viewport: Viewport,
        now_secs: f64,
    ) -> bool {
        if self.once && self.entered_at.is_some() {
            return true;
        }
        let hit = element.is_some_and(|rect| self.intersects(rect, scroll_y, viewport));
        match (hit, self.entered_at) {
            (true, None) => {
                tracing::trace!(now_secs, "element entered view");
                self.entered_at = Some(now_secs);
            }
            (false, Some(_)) => self.entered_at = None,
            _ => {}
        }
        hit
    }

    pub fn is_in_view(&self) -> bool {
        self.entered_at.is_some()
    }

    /// Clock time of the most recent entry.
    pub fn entered_at(&self) -> Option<f64> {
        self.entered_at
    }

    /// Seconds since the most recent entry.
    pub fn elapsed(&self, now_secs: f64) -> Option<f64> {
        self.entered_at.map(|t| (now_secs - t).max(0.0))
    }

    pub fn reset(&mut self) {
        self.entered_at = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/trigger.rs"]
mod tests;
