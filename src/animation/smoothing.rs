use crate::foundation::error::{StageError, StageResult};

/// Low-pass filters that chase a raw progress target across animation frames.
pub trait Smoother {
    fn set_target(&mut self, target: f64);
    /// Advance by `dt_secs` and return the new value.
    fn step(&mut self, dt_secs: f64) -> f64;
    fn value(&self) -> f64;
    fn target(&self) -> f64;
    fn is_settled(&self) -> bool;
    /// Jump to `value` with no motion (used on resize, where progress is recomputed from scratch).
    fn reset(&mut self, value: f64);
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Distance to target below which the spring snaps and stops updating.
    #[serde(default = "default_rest")]
    pub rest_delta: f64,
    /// Speed below which the spring may come to rest.
    #[serde(default = "default_rest")]
    pub rest_speed: f64,
}

fn default_mass() -> f64 {
    1.0
}

fn default_rest() -> f64 {
    0.01
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_delta: 0.01,
            rest_speed: 0.01,
        }
    }
}

impl SpringConfig {
    /// Page-level scroll smoothing (stiffness 100, damping 30, rest delta 0.001).
    pub const SCROLL: Self = Self {
        stiffness: 100.0,
        damping: 30.0,
        mass: 1.0,
        rest_delta: 0.001,
        rest_speed: 0.01,
    };

    pub fn validate(&self) -> StageResult<()> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(StageError::config("spring stiffness must be finite and > 0"));
        }
        // An undamped spring oscillates forever and never comes to rest.
        if !(self.damping.is_finite() && self.damping > 0.0) {
            return Err(StageError::config("spring damping must be finite and > 0"));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(StageError::config("spring mass must be finite and > 0"));
        }
        if !(self.rest_delta.is_finite() && self.rest_delta >= 0.0)
            || !(self.rest_speed.is_finite() && self.rest_speed >= 0.0)
        {
            return Err(StageError::config(
                "spring rest thresholds must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// `1.0` is critically damped, below is underdamped (overshoots).
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }
}

#[derive(Clone, Debug)]
pub struct SpringFilter {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
    settled: bool,
}

impl SpringFilter {
    pub fn new(config: SpringConfig, initial: f64) -> StageResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            settled: true,
        })
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Advance by `t` seconds along the exact damped-oscillator solution toward the current
    /// target. Stable for any step length and any valid config.
    fn advance(&mut self, t: f64) {
        let omega = (self.config.stiffness / self.config.mass).sqrt();
        let zeta = self.config.damping_ratio();
        let x0 = self.value - self.target;
        let v0 = self.velocity;

        let (x, v) = if (zeta - 1.0).abs() < 1e-6 {
            let b = v0 + omega * x0;
            let decay = (-omega * t).exp();
            (decay * (x0 + b * t), decay * (v0 - omega * b * t))
        } else if zeta < 1.0 {
            let a = zeta * omega;
            let wd = omega * (1.0 - zeta * zeta).sqrt();
            let b = (v0 + a * x0) / wd;
            let decay = (-a * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            (
                decay * (x0 * cos + b * sin),
                decay * (v0 * cos - (a * b + x0 * wd) * sin),
            )
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c1 = (v0 - r2 * x0) / (r1 - r2);
            let c2 = x0 - c1;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
        };

        self.value = self.target + x;
        self.velocity = v;
    }

    fn try_rest(&mut self) -> bool {
        if (self.target - self.value).abs() <= self.config.rest_delta
            && self.velocity.abs() <= self.config.rest_speed
        {
            self.value = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
        self.settled
    }
}

impl Smoother for SpringFilter {
    fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            tracing::warn!(target, "ignoring non-finite spring target");
            return;
        }
        if target == self.target {
            return;
        }
        self.target = target;
        self.settled = false;
        // Changes below the rest threshold never start motion.
        self.try_rest();
    }

    fn step(&mut self, dt_secs: f64) -> f64 {
        if self.settled || !(dt_secs.is_finite() && dt_secs > 0.0) {
            return self.value;
        }
        self.advance(dt_secs);
        self.try_rest();
        tracing::trace!(value = self.value, target = self.target, "spring step");
        self.value
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn target(&self) -> f64 {
        self.target
    }

    fn is_settled(&self) -> bool {
        self.settled
    }

    fn reset(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.settled = true;
    }
}

/// Fixed-lag catch-up: the value closes the gap to its target at a rate of `1 / lag_secs`.
#[derive(Clone, Debug)]
pub struct ScrubFilter {
    lag_secs: f64,
    value: f64,
    target: f64,
}

impl ScrubFilter {
    const SNAP: f64 = 1e-4;

    pub fn new(lag_secs: f64, initial: f64) -> StageResult<Self> {
        if !(lag_secs.is_finite() && lag_secs >= 0.0) {
            return Err(StageError::config("scrub lag must be finite and >= 0"));
        }
        Ok(Self {
            lag_secs,
            value: initial,
            target: initial,
        })
    }
}

impl Smoother for ScrubFilter {
    fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            tracing::warn!(target, "ignoring non-finite scrub target");
            return;
        }
        self.target = target;
    }

    fn step(&mut self, dt_secs: f64) -> f64 {
        if !(dt_secs.is_finite() && dt_secs > 0.0) {
            return self.value;
        }
        let alpha = if self.lag_secs == 0.0 {
            1.0
        } else {
            (dt_secs / self.lag_secs).min(1.0)
        };
        self.value += (self.target - self.value) * alpha;
        if (self.target - self.value).abs() < Self::SNAP {
            self.value = self.target;
        }
        self.value
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn target(&self) -> f64 {
        self.target
    }

    fn is_settled(&self) -> bool {
        self.value == self.target
    }

    fn reset(&mut self, value: f64) {
        self.value = value;
        self.target = value;
    }
}

/// Smoothing applied between the raw progress and the phase mapper.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Smoothing {
    Spring(SpringConfig),
    Scrub { lag_secs: f64 },
}

impl Smoothing {
    pub fn validate(&self) -> StageResult<()> {
        self.build(0.0).map(|_| ())
    }

    pub fn build(&self, initial: f64) -> StageResult<Box<dyn Smoother>> {
        Ok(match *self {
            Self::Spring(config) => Box::new(SpringFilter::new(config, initial)?),
            Self::Scrub { lag_secs } => Box::new(ScrubFilter::new(lag_secs, initial)?),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/smoothing.rs"]
mod tests;
