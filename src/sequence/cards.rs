use crate::{
    animation::keyframes::{DisplayBand, KeyframeSet},
    foundation::core::{Percent, Progress, Px},
    foundation::error::{StageError, StageResult},
    sequence::phase::{PhaseRange, SlotStage},
    style::css::{Display, Filter, ToCss, Transform},
};

/// Share of each slot spent entering and exiting; the remaining 70% is the hold.
pub const DEFAULT_TRANSITION_FRACTION: f64 = 0.15;

#[derive(Clone, Debug)]
struct CardKeyframes {
    opacity: KeyframeSet<f64>,
    scale: KeyframeSet<f64>,
    translate_y: KeyframeSet<Px>,
    blur: KeyframeSet<f64>,
}

impl CardKeyframes {
    fn for_range(range: &PhaseRange) -> StageResult<Self> {
        let at = range.positions();
        Ok(Self {
            opacity: KeyframeSet::linear(&at, vec![0.0, 1.0, 1.0, 0.0])?,
            scale: KeyframeSet::linear(&at, vec![0.9, 1.0, 1.0, 1.1])?,
            translate_y: KeyframeSet::linear(&at, vec![Px(30.0), Px(0.0), Px(0.0), Px(-30.0)])?,
            blur: KeyframeSet::linear(&at, vec![10.0, 0.0, 0.0, 10.0])?,
        })
    }
}

/// One card's partition of the shared scroll range.
#[derive(Clone, Debug)]
pub struct CardSlot {
    pub index: usize,
    pub range: PhaseRange,
    band: DisplayBand,
    keys: CardKeyframes,
}

impl CardSlot {
    pub fn style(&self, p: Progress) -> CardStyle {
        let x = p.get();
        CardStyle {
            index: self.index,
            stage: self.range.stage(x),
            opacity: self.keys.opacity.sample(x),
            scale: self.keys.scale.sample(x),
            translate_y: self.keys.translate_y.sample(x),
            blur: Px(self.keys.blur.sample(x)),
            display: self.band.sample(x),
            z_index: self.index as i32,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CardStyle {
    pub index: usize,
    pub stage: SlotStage,
    pub opacity: f64,
    pub scale: f64,
    pub translate_y: Px,
    pub blur: Px,
    pub display: Display,
    pub z_index: i32,
}

impl CardStyle {
    pub fn transform(&self) -> Transform {
        Transform {
            translate_y: self.translate_y,
            scale: self.scale,
        }
    }

    pub fn filter(&self) -> Filter {
        Filter::blur(self.blur.0)
    }
}

impl ToCss for CardStyle {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("opacity", crate::foundation::core::fmt_num(self.opacity)),
            ("transform", self.transform().to_string()),
            ("filter", self.filter().to_string()),
            ("display", self.display.as_css().to_string()),
            ("z-index", self.z_index.to_string()),
        ]
    }
}

/// Thin absolute-position indicator that mirrors progress directly.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ProgressBar {
    pub height: Percent,
}

impl ToCss for ProgressBar {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![("height", self.height.to_string())]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DeckFrame {
    pub progress: Progress,
    /// Card currently in its hold window, if any.
    pub held: Option<usize>,
    pub cards: Vec<CardStyle>,
    pub progress_bar: ProgressBar,
}

/// Sequences `count` cards over one continuous scroll range: each enters, holds fully visible,
/// then exits inside its own equal slot.
#[derive(Clone, Debug)]
pub struct CardSequencer {
    transition_fraction: f64,
    slots: Vec<CardSlot>,
}

impl CardSequencer {
    pub fn new(count: usize, transition_fraction: f64) -> StageResult<Self> {
        Self::with_display_epsilon(count, transition_fraction, DisplayBand::DEFAULT_EPSILON)
    }

    pub fn with_display_epsilon(
        count: usize,
        transition_fraction: f64,
        display_epsilon: f64,
    ) -> StageResult<Self> {
        if count == 0 {
            return Err(StageError::config("card sequencer needs at least one card"));
        }
        if !(display_epsilon.is_finite() && display_epsilon >= 0.0) {
            return Err(StageError::config("display epsilon must be finite and >= 0"));
        }
        let slots = (0..count)
            .map(|index| {
                let range = PhaseRange::slot(index, count, transition_fraction)?;
                Ok(CardSlot {
                    index,
                    range,
                    band: DisplayBand {
                        start: range.start,
                        end: range.end,
                        epsilon: display_epsilon,
                    },
                    keys: CardKeyframes::for_range(&range)?,
                })
            })
            .collect::<StageResult<Vec<_>>>()?;
        tracing::debug!(count, transition_fraction, "card sequencer configured");
        Ok(Self {
            transition_fraction,
            slots,
        })
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn transition_fraction(&self) -> f64 {
        self.transition_fraction
    }

    /// Section height in viewport units: one viewport per card.
    pub fn scroll_height_vh(&self) -> f64 {
        self.count() as f64 * 100.0
    }

    pub fn slot(&self, index: usize) -> Option<&CardSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[CardSlot] {
        &self.slots
    }

    pub fn card_style(&self, index: usize, p: Progress) -> StageResult<CardStyle> {
        self.slot(index)
            .map(|slot| slot.style(p))
            .ok_or_else(|| {
                StageError::evaluation(format!(
                    "card {index} out of range for {} cards",
                    self.count()
                ))
            })
    }

    pub fn held_card(&self, p: Progress) -> Option<usize> {
        let x = p.get();
        self.slots
            .iter()
            .find(|slot| slot.range.in_hold(x))
            .map(|slot| slot.index)
    }

    pub fn progress_bar(&self, p: Progress) -> ProgressBar {
        ProgressBar {
            height: Percent(p.get() * 100.0),
        }
    }

    pub fn frame(&self, p: Progress) -> DeckFrame {
        DeckFrame {
            progress: p,
            held: self.held_card(p),
            cards: self.slots.iter().map(|slot| slot.style(p)).collect(),
            progress_bar: self.progress_bar(p),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/cards.rs"]
mod tests;
