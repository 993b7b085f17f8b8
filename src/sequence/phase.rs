use crate::foundation::error::{StageError, StageResult};

/// A sub-interval `[start, end]` of the progress domain with transition zones carved from both
/// ends: `start <= entrance <= exit <= end`, strict at the outer bounds when the transition
/// fraction is non-zero.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseRange {
    pub start: f64,
    pub entrance: f64,
    pub exit: f64,
    pub end: f64,
}

/// Where a progress value sits relative to a [`PhaseRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStage {
    Before,
    Entering,
    Holding,
    Exiting,
    After,
}

pub(crate) fn validate_transition_fraction(fraction: f64) -> StageResult<()> {
    if !(fraction.is_finite() && (0.0..0.5).contains(&fraction)) {
        return Err(StageError::config(format!(
            "transition fraction must be within [0, 0.5), got {fraction}"
        )));
    }
    Ok(())
}

impl PhaseRange {
    pub fn new(start: f64, end: f64, transition_fraction: f64) -> StageResult<Self> {
        validate_transition_fraction(transition_fraction)?;
        if !(start.is_finite() && end.is_finite()) {
            return Err(StageError::config("phase bounds must be finite"));
        }
        if !(0.0 <= start && start < end && end <= 1.0) {
            return Err(StageError::config(format!(
                "phase bounds must satisfy 0 <= start < end <= 1, got [{start}, {end}]"
            )));
        }
        let zone = (end - start) * transition_fraction;
        Ok(Self {
            start,
            entrance: start + zone,
            exit: end - zone,
            end,
        })
    }

    /// Slot `index` of `count` equal partitions of `[0, 1]`.
    pub fn slot(index: usize, count: usize, transition_fraction: f64) -> StageResult<Self> {
        if count == 0 {
            return Err(StageError::config("slot count must be > 0"));
        }
        if index >= count {
            return Err(StageError::config(format!(
                "slot index {index} out of range for {count} slots"
            )));
        }
        let n = count as f64;
        Self::new(index as f64 / n, (index + 1) as f64 / n, transition_fraction)
    }

    /// `[start, entrance, exit, end]`, the keyframe positions for this phase.
    pub fn positions(&self) -> [f64; 4] {
        [self.start, self.entrance, self.exit, self.end]
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn in_hold(&self, x: f64) -> bool {
        self.entrance <= x && x <= self.exit
    }

    pub fn stage(&self, x: f64) -> SlotStage {
        if x < self.start {
            SlotStage::Before
        } else if x < self.entrance {
            SlotStage::Entering
        } else if x <= self.exit {
            SlotStage::Holding
        } else if x < self.end {
            SlotStage::Exiting
        } else {
            SlotStage::After
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/phase.rs"]
mod tests;
