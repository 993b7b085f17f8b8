use crate::{
    animation::ease::Ease,
    foundation::core::{Percent, Progress, Px},
    foundation::error::{StageError, StageResult},
    foundation::math,
    style::css::Display,
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        math::lerp(*a, *b, t)
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Px {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Px(math::lerp(a.0, b.0, t))
    }
}

impl Lerp for Percent {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Percent(math::lerp(a.0, b.0, t))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Position in the progress domain.
    pub at: f64,
    pub value: T,
    /// Ease applied toward the next key.
    #[serde(default)]
    pub ease: Ease,
}

impl<T> Keyframe<T> {
    pub fn new(at: f64, value: T) -> Self {
        Self {
            at,
            value,
            ease: Ease::Linear,
        }
    }
}

/// Ordered keyframes for one animated property.
///
/// Positions are non-decreasing. Sampling interpolates between the bracketing pair and clamps to
/// the first/last value outside the covered positions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    try_from = "Vec<Keyframe<T>>",
    into = "Vec<Keyframe<T>>",
    bound(
        serialize = "T: Clone + serde::Serialize",
        deserialize = "T: serde::Deserialize<'de>"
    )
)]
pub struct KeyframeSet<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> TryFrom<Vec<Keyframe<T>>> for KeyframeSet<T> {
    type Error = StageError;

    fn try_from(keys: Vec<Keyframe<T>>) -> StageResult<Self> {
        validate_positions(keys.iter().map(|k| k.at))?;
        Ok(Self { keys })
    }
}

impl<T> From<KeyframeSet<T>> for Vec<Keyframe<T>> {
    fn from(set: KeyframeSet<T>) -> Self {
        set.keys
    }
}

fn validate_positions(positions: impl Iterator<Item = f64>) -> StageResult<()> {
    let mut prev: Option<f64> = None;
    let mut count = 0usize;
    for at in positions {
        if !at.is_finite() {
            return Err(StageError::animation("keyframe positions must be finite"));
        }
        if prev.is_some_and(|p| at < p) {
            return Err(StageError::animation(
                "keyframe positions must be non-decreasing",
            ));
        }
        prev = Some(at);
        count += 1;
    }
    if count == 0 {
        return Err(StageError::animation("keyframe set must have at least one key"));
    }
    Ok(())
}

impl<T> KeyframeSet<T> {
    pub fn new(keys: Vec<Keyframe<T>>) -> StageResult<Self> {
        Self::try_from(keys)
    }

    /// Pair `positions[i]` with `values[i]`, all segments linear.
    pub fn linear(positions: &[f64], values: Vec<T>) -> StageResult<Self> {
        if positions.len() != values.len() {
            return Err(StageError::animation(format!(
                "keyframe positions ({}) and values ({}) differ in length",
                positions.len(),
                values.len()
            )));
        }
        let keys = positions
            .iter()
            .zip(values)
            .map(|(&at, value)| Keyframe::new(at, value))
            .collect();
        Self::new(keys)
    }

    /// Replace the ease of every segment.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        for k in &mut self.keys {
            k.ease = ease;
        }
        self
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn validate(&self) -> StageResult<()> {
        validate_positions(self.keys.iter().map(|k| k.at))
    }
}

impl<T> KeyframeSet<T>
where
    T: Lerp + Clone,
{
    pub fn sample(&self, x: f64) -> T {
        let keys = &self.keys;
        let first = &keys[0];
        let last = &keys[keys.len() - 1];
        if x.is_nan() || x <= first.at {
            return first.value.clone();
        }
        if x >= last.at {
            return last.value.clone();
        }

        // first.at < x < last.at, so 1 <= idx < len.
        let idx = keys.partition_point(|k| k.at <= x);
        let a = &keys[idx - 1];
        let b = &keys[idx];
        let span = b.at - a.at;
        if span == 0.0 {
            return b.value.clone();
        }

        let t = math::inverse_lerp(a.at, b.at, x);
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }

    pub fn sample_progress(&self, p: Progress) -> T {
        self.sample(p.get())
    }

    /// Sample and derive a secondary value (e.g. a filter string from a radius).
    pub fn sample_map<U>(&self, x: f64, f: impl FnOnce(T) -> U) -> U {
        f(self.sample(x))
    }
}

impl KeyframeSet<f64> {
    /// `(min, max)` over all key values.
    pub fn value_bounds(&self) -> (f64, f64) {
        self.keys
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), k| {
                (lo.min(k.value), hi.max(k.value))
            })
    }
}

/// Visibility toggle around a phase, widened by `epsilon` on both sides so content leaves layout
/// slightly before and after its active range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayBand {
    pub start: f64,
    pub end: f64,
    pub epsilon: f64,
}

impl DisplayBand {
    pub const DEFAULT_EPSILON: f64 = 0.05;

    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            epsilon: Self::DEFAULT_EPSILON,
        }
    }

    pub fn sample(&self, x: f64) -> Display {
        if x >= self.start - self.epsilon && x <= self.end + self.epsilon {
            Display::Flex
        } else {
            Display::None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
