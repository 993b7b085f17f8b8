use std::path::Path;

use crate::{
    animation::keyframes::{DisplayBand, KeyframeSet},
    animation::smoothing::Smoothing,
    foundation::core::{Rect, Viewport},
    foundation::error::{StageError, StageResult},
    pinned::story::StoryConfig,
    reveal::{stagger::StaggerGroup, trigger::InViewTrigger},
    scroll::offset::ScrollOffset,
    sequence::{cards::DEFAULT_TRANSITION_FRACTION, phase::validate_transition_fraction},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A scroll-driven page: sections stacked vertically inside one viewport.
///
/// A page is a pure data model that can be:
/// - built programmatically (see [`crate::PageBuilder`])
/// - serialized/deserialized via Serde (JSON)
///
/// Evaluation is performed by [`crate::Evaluator`] (pure, per scroll position) or by a live
/// [`crate::StageSession`] mounted on a [`crate::ScrollHost`].
pub struct Page {
    /// Viewport used for layout and offline sampling.
    #[serde(default)]
    pub viewport: Viewport,
    /// Sections in document order.
    pub sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One scroll-tracked block of the page.
pub struct Section {
    /// Section identifier (unique within a page).
    pub id: String,
    /// Offsets mapping the section's scroll range onto progress.
    #[serde(default)]
    pub offset: ScrollOffset,
    /// Optional smoothing between raw and published progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<Smoothing>,
    /// What the section animates.
    #[serde(flatten)]
    pub kind: SectionKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Section choreography.
pub enum SectionKind {
    /// Stack of cards entering and exiting one after another.
    CardDeck(CardDeckSpec),
    /// Pinned five-phase image and content story.
    PinnedStory(StoryConfig),
    /// One style property mapped from progress through keyframes.
    ScrollTransform(ScrollTransformSpec),
    /// Children fading in with a stagger once the section enters view.
    Reveal(RevealSpec),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Card deck parameters.
pub struct CardDeckSpec {
    /// Number of cards (one viewport of scroll each).
    pub cards: usize,
    /// Share of each slot spent entering and exiting.
    #[serde(default = "default_transition_fraction")]
    pub transition_fraction: f64,
    /// Display band tolerance around each slot.
    #[serde(default = "default_display_epsilon")]
    pub display_epsilon: f64,
}

fn default_transition_fraction() -> f64 {
    DEFAULT_TRANSITION_FRACTION
}

fn default_display_epsilon() -> f64 {
    DisplayBand::DEFAULT_EPSILON
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Style property driven by a [`ScrollTransformSpec`].
pub enum MappedProperty {
    Opacity,
    #[default]
    Scale,
    /// Pixels.
    TranslateY,
    /// Blur radius in pixels.
    Blur,
}

impl MappedProperty {
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Scale | Self::TranslateY => "transform",
            Self::Blur => "filter",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Keyframed mapping of section progress onto one property.
pub struct ScrollTransformSpec {
    /// Property receiving the mapped value.
    #[serde(default)]
    pub property: MappedProperty,
    /// Progress to value keyframes.
    pub keyframes: KeyframeSet<f64>,
    /// Section height in viewport units.
    #[serde(default = "default_height_vh")]
    pub height_vh: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// In-view staggered reveal.
pub struct RevealSpec {
    /// Number of staggered children.
    pub children: usize,
    /// Intersection trigger settings.
    #[serde(default)]
    pub trigger: InViewTrigger,
    /// Child orchestration.
    #[serde(default)]
    pub stagger: StaggerGroup,
    /// Section height in viewport units.
    #[serde(default = "default_height_vh")]
    pub height_vh: f64,
}

fn default_height_vh() -> f64 {
    100.0
}

impl Section {
    /// Smoothing used when the section is mounted live. A pinned story without explicit
    /// smoothing scrubs with its own lag.
    pub fn effective_smoothing(&self) -> Option<Smoothing> {
        match (&self.smoothing, &self.kind) {
            (Some(s), _) => Some(*s),
            (None, SectionKind::PinnedStory(config)) if config.scrub_secs > 0.0 => {
                Some(Smoothing::Scrub {
                    lag_secs: config.scrub_secs,
                })
            }
            _ => None,
        }
    }
}

impl SectionKind {
    /// Height in viewport units, including pin spacing for pinned sections.
    pub fn height_vh(&self) -> f64 {
        match self {
            Self::CardDeck(spec) => spec.cards as f64 * 100.0,
            Self::PinnedStory(config) => 100.0 + config.scroll_length * 100.0,
            Self::ScrollTransform(spec) => spec.height_vh,
            Self::Reveal(spec) => spec.height_vh,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CardDeck(_) => "card_deck",
            Self::PinnedStory(_) => "pinned_story",
            Self::ScrollTransform(_) => "scroll_transform",
            Self::Reveal(_) => "reveal",
        }
    }
}

impl Page {
    pub fn from_json(s: &str) -> StageResult<Self> {
        let page: Self = serde_json::from_str(s)?;
        page.validate()?;
        Ok(page)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            StageError::config(format!("failed to read page '{}': {e}", path.display()))
        })?;
        Self::from_json(&s)
    }

    pub fn to_json_pretty(&self) -> StageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate invariants required for evaluation.
    pub fn validate(&self) -> StageResult<()> {
        self.viewport.validate()?;
        if self.sections.is_empty() {
            return Err(StageError::config("page must have at least one section"));
        }

        let mut ids = std::collections::BTreeSet::new();
        for section in &self.sections {
            let ctx = |e: StageError| e.context(format!("section '{}'", section.id));
            if section.id.trim().is_empty() {
                return Err(StageError::config("section id must be non-empty"));
            }
            if !ids.insert(section.id.as_str()) {
                return Err(StageError::config(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            if let Some(smoothing) = &section.smoothing {
                smoothing.validate().map_err(ctx)?;
            }
            section.kind.validate().map_err(ctx)?;
        }
        Ok(())
    }

    /// Document rects of every section in `viewport`, stacked from the top of the page.
    pub fn layout(&self, viewport: Viewport) -> Vec<Rect> {
        let mut y = 0.0;
        self.sections
            .iter()
            .map(|section| {
                let h = viewport.vh(section.kind.height_vh());
                let rect = Rect::new(0.0, y, viewport.width, y + h);
                y += h;
                rect
            })
            .collect()
    }

    pub fn document_height(&self, viewport: Viewport) -> f64 {
        self.sections
            .iter()
            .map(|s| viewport.vh(s.kind.height_vh()))
            .sum()
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self, viewport: Viewport) -> f64 {
        (self.document_height(viewport) - viewport.height).max(0.0)
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }
}

impl SectionKind {
    fn validate(&self) -> StageResult<()> {
        match self {
            Self::CardDeck(spec) => {
                if spec.cards == 0 {
                    return Err(StageError::config("card_deck.cards must be >= 1"));
                }
                validate_transition_fraction(spec.transition_fraction)?;
                if !(spec.display_epsilon.is_finite() && spec.display_epsilon >= 0.0) {
                    return Err(StageError::config("card_deck.display_epsilon must be >= 0"));
                }
            }
            Self::PinnedStory(config) => config.validate()?,
            Self::ScrollTransform(spec) => {
                spec.keyframes.validate()?;
                validate_height(spec.height_vh)?;
            }
            Self::Reveal(spec) => {
                spec.stagger.validate()?;
                if !spec.trigger.margin_px.is_finite() {
                    return Err(StageError::config("reveal.trigger.margin_px must be finite"));
                }
                validate_height(spec.height_vh)?;
            }
        }
        Ok(())
    }
}

fn validate_height(height_vh: f64) -> StageResult<()> {
    if height_vh.is_finite() && height_vh > 0.0 {
        Ok(())
    } else {
        Err(StageError::config("section height_vh must be > 0"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
