//! Position-parameter timelines: tweens placed in seconds relative to each other, sampled as a
//! pure function of time.

use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    animation::keyframes::Lerp,
    foundation::error::{StageError, StageResult},
    foundation::math,
    style::css::ClipInset,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prop {
    Opacity,
    TranslateY,
    Scale,
    Clip,
    Grayscale,
    Brightness,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Scalar(f64),
    Clip(ClipInset),
}

impl PropValue {
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Clip(_) => None,
        }
    }

    pub fn as_clip(self) -> Option<ClipInset> {
        match self {
            Self::Clip(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }

    fn fits(self, prop: Prop) -> bool {
        matches!(
            (prop, self),
            (Prop::Clip, Self::Clip(_))
                | (
                    Prop::Opacity
                        | Prop::TranslateY
                        | Prop::Scale
                        | Prop::Grayscale
                        | Prop::Brightness,
                    Self::Scalar(_)
                )
        )
    }
}

impl Lerp for PropValue {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(math::lerp(*a, *b, t)),
            (Self::Clip(a), Self::Clip(b)) => Self::Clip(ClipInset::lerp(a, b, t)),
            _ => {
                if t >= 1.0 {
                    *b
                } else {
                    *a
                }
            }
        }
    }
}

/// Where a tween starts, relative to what is already on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    Append,
    /// Offset from the current end (`"+=1"`, `"-=0.5"`).
    FromEnd(f64),
    /// Offset from the start of the previously added tween (`"<"`, `"<+=0.1"`).
    FromPreviousStart(f64),
    /// Offset from the end of the previously added tween (`">"`, `">-=0.2"`).
    FromPreviousEnd(f64),
    /// Absolute time in seconds.
    At(f64),
}

impl Position {
    pub fn parse(s: &str) -> StageResult<Self> {
        let s = s.trim();
        let bad = || StageError::animation(format!("invalid timeline position '{s}'"));
        let offset = |rest: &str| -> StageResult<f64> {
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(0.0);
            }
            let (sign, num) = if let Some(n) = rest.strip_prefix("+=") {
                (1.0, n)
            } else if let Some(n) = rest.strip_prefix("-=") {
                (-1.0, n)
            } else {
                return Err(bad());
            };
            let v: f64 = num.trim().parse().map_err(|_| bad())?;
            if !v.is_finite() {
                return Err(bad());
            }
            Ok(sign * v)
        };

        if s.is_empty() {
            return Ok(Self::Append);
        }
        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::FromPreviousStart(offset(rest)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::FromPreviousEnd(offset(rest)?));
        }
        if s.starts_with("+=") || s.starts_with("-=") {
            return Ok(Self::FromEnd(offset(s)?));
        }
        let v: f64 = s.parse().map_err(|_| bad())?;
        if !v.is_finite() {
            return Err(bad());
        }
        Ok(Self::At(v))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub duration: f64,
    pub ease: Ease,
    pub position: Position,
    /// Start offset between consecutive targets.
    pub stagger: f64,
}

impl TweenSpec {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ease: Ease::OutQuad,
            position: Position::Append,
            stagger: 0.0,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn stagger(mut self, each: f64) -> Self {
        self.stagger = each;
        self
    }
}

#[derive(Clone, Debug)]
struct Tween {
    start: f64,
    duration: f64,
    ease: Ease,
    from: PropValue,
    to: PropValue,
    /// Render the start value before the tween begins.
    immediate: bool,
}

impl Tween {
    fn sample(&self, t: f64) -> PropValue {
        let local = math::inverse_lerp(self.start, self.start + self.duration, t);
        PropValue::lerp(&self.from, &self.to, self.ease.apply(local))
    }
}

/// Tweens keyed by `(target, property)`, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    bases: BTreeMap<(String, Prop), PropValue>,
    tracks: BTreeMap<(String, Prop), Vec<Tween>>,
    duration: f64,
    previous: Option<(f64, f64)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Value a property holds before any tween touches it.
    pub fn set(&mut self, target: &str, prop: Prop, value: PropValue) -> StageResult<&mut Self> {
        check_kind(target, prop, value)?;
        self.bases.insert((target.to_string(), prop), value);
        Ok(self)
    }

    fn resolve(&self, position: Position) -> f64 {
        let (prev_start, prev_end) = self.previous.unwrap_or((0.0, 0.0));
        let t = match position {
            Position::Append => self.duration,
            Position::FromEnd(d) => self.duration + d,
            Position::FromPreviousStart(d) => prev_start + d,
            Position::FromPreviousEnd(d) => prev_end + d,
            Position::At(t) => t,
        };
        t.max(0.0)
    }

    fn span(&self, spec: &TweenSpec, targets: usize) -> StageResult<(f64, f64)> {
        if !(spec.duration.is_finite() && spec.duration >= 0.0) {
            return Err(StageError::animation("tween duration must be finite and >= 0"));
        }
        if !(spec.stagger.is_finite() && spec.stagger >= 0.0) {
            return Err(StageError::animation("tween stagger must be finite and >= 0"));
        }
        let start = self.resolve(spec.position);
        let end = start + spec.stagger * targets.saturating_sub(1) as f64 + spec.duration;
        Ok((start, end))
    }

    fn commit(&mut self, (start, end): (f64, f64)) {
        self.previous = Some((start, end));
        self.duration = self.duration.max(end);
    }

    /// Tween each target's properties from their value at the tween start to `props`.
    /// Returns the start time.
    pub fn to(
        &mut self,
        targets: &[&str],
        props: &[(Prop, PropValue)],
        spec: TweenSpec,
    ) -> StageResult<f64> {
        self.add(targets, props, spec, false)
    }

    /// Tween each target's properties from `props` to their value at the tween start, rendering
    /// the `props` values immediately. Returns the start time.
    pub fn from(
        &mut self,
        targets: &[&str],
        props: &[(Prop, PropValue)],
        spec: TweenSpec,
    ) -> StageResult<f64> {
        self.add(targets, props, spec, true)
    }

    /// Empty tween that only advances the timeline (reading time). Returns the start time.
    pub fn hold(&mut self, duration: f64, position: Position) -> StageResult<f64> {
        let span = self.span(&TweenSpec::new(duration).at(position), 0)?;
        self.commit(span);
        Ok(span.0)
    }

    fn add(
        &mut self,
        targets: &[&str],
        props: &[(Prop, PropValue)],
        spec: TweenSpec,
        is_from: bool,
    ) -> StageResult<f64> {
        for target in targets {
            for &(prop, value) in props {
                check_kind(target, prop, value)?;
            }
        }
        let span = self.span(&spec, targets.len())?;
        let start = span.0;

        let mut pending = Vec::with_capacity(targets.len() * props.len());
        for (i, target) in targets.iter().enumerate() {
            let t0 = start + spec.stagger * i as f64;
            for &(prop, value) in props {
                let current = self.value(target, prop, t0).ok_or_else(|| {
                    StageError::animation(format!(
                        "{target}.{prop:?} has no base value to tween {}",
                        if is_from { "to" } else { "from" }
                    ))
                })?;
                let (from, to) = if is_from {
                    (value, current)
                } else {
                    (current, value)
                };
                pending.push((
                    (target.to_string(), prop),
                    Tween {
                        start: t0,
                        duration: spec.duration,
                        ease: spec.ease,
                        from,
                        to,
                        immediate: is_from,
                    },
                ));
            }
        }

        for (key, tween) in pending {
            self.tracks.entry(key).or_default().push(tween);
        }
        self.commit(span);
        Ok(start)
    }

    /// Value of `target.prop` at time `t`, or `None` if it has neither a base nor a tween.
    pub fn value(&self, target: &str, prop: Prop, t: f64) -> Option<PropValue> {
        let key = (target.to_string(), prop);
        let base = self.bases.get(&key).copied();
        let Some(tweens) = self.tracks.get(&key) else {
            return base;
        };

        // Latest-starting tween that has begun wins; ties go to the one added last.
        let active = tweens
            .iter()
            .enumerate()
            .filter(|(_, tw)| tw.start <= t)
            .max_by(|(ia, a), (ib, b)| a.start.total_cmp(&b.start).then(ia.cmp(ib)));
        match active {
            Some((_, tw)) => Some(tw.sample(t)),
            None => {
                let first = tweens
                    .iter()
                    .min_by(|a, b| a.start.total_cmp(&b.start))?;
                if first.immediate {
                    Some(first.from)
                } else {
                    base.or(Some(first.from))
                }
            }
        }
    }

    pub fn scalar(&self, target: &str, prop: Prop, t: f64) -> Option<f64> {
        self.value(target, prop, t).and_then(PropValue::as_scalar)
    }

    pub fn clip(&self, target: &str, prop: Prop, t: f64) -> Option<ClipInset> {
        self.value(target, prop, t).and_then(PropValue::as_clip)
    }
}

fn check_kind(target: &str, prop: Prop, value: PropValue) -> StageResult<()> {
    if value.fits(prop) {
        Ok(())
    } else {
        Err(StageError::animation(format!(
            "{target}.{prop:?} cannot take value {value:?}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pinned/timeline.rs"]
mod tests;
