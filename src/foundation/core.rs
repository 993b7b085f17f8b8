use std::fmt;

use crate::foundation::error::{StageError, StageResult};

pub use kurbo::{Rect, Vec2};

/// Normalized scroll progress, always within `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Progress(f64);

impl Progress {
    /// Progress at the start of a tracked range.
    pub const START: Self = Self(0.0);
    /// Progress at the end of a tracked range.
    pub const END: Self = Self(1.0);

    /// Clamp `value` into `[0, 1]`. NaN maps to `0`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// `traversed / length`, clamped. A non-positive length is a step at zero.
    pub fn from_ratio(traversed: f64, length: f64) -> Self {
        if length <= 0.0 || !length.is_finite() {
            return if traversed >= 0.0 {
                Self::END
            } else {
                Self::START
            };
        }
        Self::new(traversed / length)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Progress> for f64 {
    fn from(p: Progress) -> Self {
        p.0
    }
}

/// A CSS pixel length.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Px(pub f64);

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", fmt_num(self.0))
    }
}

/// A CSS percentage (`100.0` is `100%`).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Percent(pub f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", fmt_num(self.0))
    }
}

/// Visible viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        let v = Self { width, height };
        v.validate()?;
        Ok(v)
    }

    pub fn validate(&self) -> StageResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(StageError::config("viewport width must be finite and > 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(StageError::config("viewport height must be finite and > 0"));
        }
        Ok(())
    }

    /// Convert viewport-height units (`100.0` is one full viewport) to pixels.
    pub fn vh(&self, units: f64) -> f64 {
        self.height * units / 100.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

/// Format a number without trailing zeros (`30.0 -> "30"`, `0.25 -> "0.25"`).
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let s = format!("{rounded:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
