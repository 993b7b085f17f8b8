use crate::{
    animation::ease::Ease,
    foundation::core::{Vec2, fmt_num},
    foundation::error::{StageError, StageResult},
    foundation::math,
    style::css::ToCss,
};

/// Parent/child orchestration for an in-view reveal: each child fades and slides in from
/// `offset`, starting `delay_children + index * stagger_children` seconds after the trigger.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaggerGroup {
    pub delay_children: f64,
    pub stagger_children: f64,
    pub duration: f64,
    pub ease: Ease,
    /// Starting translation of every child, in pixels.
    pub offset: Vec2,
}

impl Default for StaggerGroup {
    fn default() -> Self {
        Self {
            delay_children: 0.2,
            stagger_children: 0.15,
            duration: 0.8,
            ease: Ease::CubicBezier {
                x1: 0.22,
                y1: 1.0,
                x2: 0.36,
                y2: 1.0,
            },
            offset: Vec2::new(20.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RevealStyle {
    pub opacity: f64,
    pub translate: Vec2,
}

impl RevealStyle {
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        translate: Vec2::ZERO,
    };
}

impl ToCss for RevealStyle {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("opacity", fmt_num(self.opacity)),
            (
                "transform",
                format!(
                    "translate({}px, {}px)",
                    fmt_num(self.translate.x),
                    fmt_num(self.translate.y)
                ),
            ),
        ]
    }
}

impl StaggerGroup {
    pub fn validate(&self) -> StageResult<()> {
        for (name, v) in [
            ("delay_children", self.delay_children),
            ("stagger_children", self.stagger_children),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(StageError::config(format!("reveal.{name} must be >= 0")));
            }
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(StageError::config("reveal.duration must be > 0"));
        }
        if !(self.offset.x.is_finite() && self.offset.y.is_finite()) {
            return Err(StageError::config("reveal.offset must be finite"));
        }
        Ok(())
    }

    pub fn child_start(&self, index: usize) -> f64 {
        self.delay_children + self.stagger_children * index as f64
    }

    /// Seconds from the trigger until `count` children have finished.
    pub fn total_duration(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.child_start(count - 1) + self.duration
    }

    /// Eased progress of child `index`, `elapsed` seconds after the trigger fired.
    pub fn child_progress(&self, index: usize, elapsed: f64) -> f64 {
        let start = self.child_start(index);
        let local = math::inverse_lerp(start, start + self.duration, elapsed);
        self.ease.apply(local)
    }

    pub fn child_style(&self, index: usize, elapsed: Option<f64>) -> RevealStyle {
        let Some(elapsed) = elapsed else {
            return RevealStyle {
                translate: self.offset,
                ..RevealStyle::HIDDEN
            };
        };
        let k = self.child_progress(index, elapsed);
        RevealStyle {
            opacity: k,
            translate: self.offset * (1.0 - k),
        }
    }

    pub fn styles(&self, count: usize, elapsed: Option<f64>) -> Vec<RevealStyle> {
        (0..count).map(|i| self.child_style(i, elapsed)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/stagger.rs"]
mod tests;
