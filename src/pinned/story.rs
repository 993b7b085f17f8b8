use crate::{
    animation::ease::Ease,
    foundation::core::{Percent, Progress, Px, Rect, Viewport, fmt_num},
    foundation::error::{StageError, StageResult},
    pinned::timeline::{Position, Prop, PropValue, Timeline, TweenSpec},
    style::css::{ClipInset, Filter, ToCss, Transform},
};

pub const STORY_IMAGE: &str = "image";
pub const STORY_CONTENT: &str = "content";
/// Content children, in stagger order.
pub const STORY_ITEMS: [&str; 4] = ["badge", "heading", "description", "details"];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Pinned scroll distance in viewport heights.
    pub scroll_length: f64,
    /// Catch-up lag applied to scroll progress, in seconds.
    pub scrub_secs: f64,
    pub stagger_secs: f64,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            scroll_length: 2.5,
            scrub_secs: 0.6,
            stagger_secs: 0.15,
        }
    }
}

impl StoryConfig {
    pub fn validate(&self) -> StageResult<()> {
        if !(self.scroll_length.is_finite() && self.scroll_length > 0.0) {
            return Err(StageError::config("pinned_story.scroll_length must be > 0"));
        }
        if !(self.scrub_secs.is_finite() && self.scrub_secs >= 0.0) {
            return Err(StageError::config("pinned_story.scrub_secs must be >= 0"));
        }
        if !(self.stagger_secs.is_finite() && self.stagger_secs >= 0.0) {
            return Err(StageError::config("pinned_story.stagger_secs must be >= 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryPhase {
    Reveal,
    Entrance,
    Hold,
    Exit,
    Settle,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ImageStyle {
    pub clip: ClipInset,
    pub scale: f64,
    pub filter: Filter,
}

impl ToCss for ImageStyle {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("clip-path", self.clip.to_string()),
            (
                "transform",
                format!("scale({})", fmt_num(self.scale)),
            ),
            ("filter", self.filter.to_string()),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FadeStyle {
    pub opacity: f64,
    pub translate_y: Px,
}

impl ToCss for FadeStyle {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("opacity", fmt_num(self.opacity)),
            (
                "transform",
                Transform {
                    translate_y: self.translate_y,
                    scale: 1.0,
                }
                .to_string(),
            ),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StoryFrame {
    pub progress: Progress,
    pub time: f64,
    pub phase: StoryPhase,
    pub image: ImageStyle,
    pub content: FadeStyle,
    pub items: Vec<(&'static str, FadeStyle)>,
}

/// Five-phase pinned narrative driven by scroll progress through the pin range.
#[derive(Clone, Debug)]
pub struct PinnedStory {
    config: StoryConfig,
    timeline: Timeline,
    labels: [(StoryPhase, f64); 5],
}

impl PinnedStory {
    pub fn new(config: StoryConfig) -> StageResult<Self> {
        config.validate()?;
        let mut tl = Timeline::new();

        tl.set(STORY_IMAGE, Prop::Clip, PropValue::Clip(ClipInset::new(10.0, 4.0, 48.0)))?;
        tl.set(STORY_IMAGE, Prop::Scale, PropValue::Scalar(0.96))?;
        tl.set(STORY_IMAGE, Prop::Grayscale, PropValue::Scalar(0.0))?;
        tl.set(STORY_IMAGE, Prop::Brightness, PropValue::Scalar(1.0))?;
        tl.set(STORY_CONTENT, Prop::Opacity, PropValue::Scalar(0.0))?;
        tl.set(STORY_CONTENT, Prop::TranslateY, PropValue::Scalar(48.0))?;
        for item in STORY_ITEMS {
            tl.set(item, Prop::Opacity, PropValue::Scalar(1.0))?;
            tl.set(item, Prop::TranslateY, PropValue::Scalar(0.0))?;
        }

        let reveal = tl.to(
            &[STORY_IMAGE],
            &[
                (Prop::Clip, PropValue::Clip(ClipInset::FULL)),
                (Prop::Scale, PropValue::Scalar(1.0)),
            ],
            TweenSpec::new(2.0).ease(Ease::InOutQuart),
        )?;
        let entrance = tl.to(
            &[STORY_CONTENT],
            &[
                (Prop::Opacity, PropValue::Scalar(1.0)),
                (Prop::TranslateY, PropValue::Scalar(0.0)),
            ],
            TweenSpec::new(1.0)
                .ease(Ease::OutCubic)
                .at(Position::FromEnd(-0.5)),
        )?;
        tl.from(
            &STORY_ITEMS,
            &[
                (Prop::TranslateY, PropValue::Scalar(24.0)),
                (Prop::Opacity, PropValue::Scalar(0.0)),
            ],
            TweenSpec::new(0.8)
                .ease(Ease::BackOut { overshoot: 1.4 })
                .stagger(config.stagger_secs)
                .at(Position::FromPreviousStart(0.0)),
        )?;
        let hold = tl.hold(1.5, Position::Append)?;
        let exit = tl.to(
            &[STORY_CONTENT],
            &[
                (Prop::Opacity, PropValue::Scalar(0.0)),
                (Prop::TranslateY, PropValue::Scalar(-40.0)),
            ],
            TweenSpec::new(0.8).ease(Ease::InCubic),
        )?;
        let settle = tl.to(
            &[STORY_IMAGE],
            &[
                (Prop::Clip, PropValue::Clip(ClipInset::new(12.0, 4.0, 48.0))),
                (Prop::Scale, PropValue::Scalar(0.92)),
                (Prop::Grayscale, PropValue::Scalar(100.0)),
                (Prop::Brightness, PropValue::Scalar(0.7)),
            ],
            TweenSpec::new(2.0)
                .ease(Ease::InOutQuart)
                .at(Position::FromPreviousStart(0.1)),
        )?;

        tracing::debug!(duration = tl.duration(), "built pinned story timeline");
        Ok(Self {
            config,
            timeline: tl,
            labels: [
                (StoryPhase::Reveal, reveal),
                (StoryPhase::Entrance, entrance),
                (StoryPhase::Hold, hold),
                (StoryPhase::Exit, exit),
                (StoryPhase::Settle, settle),
            ],
        })
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Phase start times in seconds.
    pub fn labels(&self) -> &[(StoryPhase, f64)] {
        &self.labels
    }

    pub fn time_at(&self, p: Progress) -> f64 {
        p.get() * self.duration()
    }

    /// Last phase whose start label is at or before `time`.
    pub fn phase_at(&self, time: f64) -> StoryPhase {
        self.labels
            .iter()
            .take_while(|(_, start)| *start <= time)
            .last()
            .map_or(StoryPhase::Reveal, |(phase, _)| *phase)
    }

    fn scalar(&self, target: &str, prop: Prop, t: f64, fallback: f64) -> f64 {
        self.timeline.scalar(target, prop, t).unwrap_or(fallback)
    }

    fn fade(&self, target: &str, t: f64) -> FadeStyle {
        FadeStyle {
            // Back eases overshoot; opacity cannot.
            opacity: self.scalar(target, Prop::Opacity, t, 1.0).clamp(0.0, 1.0),
            translate_y: Px(self.scalar(target, Prop::TranslateY, t, 0.0)),
        }
    }

    pub fn frame(&self, p: Progress) -> StoryFrame {
        let t = self.time_at(p);
        let image = ImageStyle {
            clip: self
                .timeline
                .clip(STORY_IMAGE, Prop::Clip, t)
                .unwrap_or(ClipInset::FULL),
            scale: self.scalar(STORY_IMAGE, Prop::Scale, t, 1.0),
            filter: Filter {
                blur: Px(0.0),
                grayscale: Percent(self.scalar(STORY_IMAGE, Prop::Grayscale, t, 0.0)),
                brightness: self.scalar(STORY_IMAGE, Prop::Brightness, t, 1.0),
            },
        };
        StoryFrame {
            progress: p,
            time: t,
            phase: self.phase_at(t),
            image,
            content: self.fade(STORY_CONTENT, t),
            items: STORY_ITEMS.iter().map(|&name| (name, self.fade(name, t))).collect(),
        }
    }

    pub fn pin_range(&self, section: Rect, viewport: Viewport) -> PinRange {
        PinRange {
            start: section.y0,
            length: viewport.vh(self.config.scroll_length * 100.0),
        }
    }
}

/// Scroll span over which the section stays fixed ("top top" to "+=length").
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PinRange {
    pub start: f64,
    pub length: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PinState {
    Before,
    Pinned { progress: Progress, translate_y: Px },
    After,
}

impl PinState {
    pub fn progress(self) -> Progress {
        match self {
            Self::Before => Progress::START,
            Self::Pinned { progress, .. } => progress,
            Self::After => Progress::END,
        }
    }

    pub fn is_pinned(self) -> bool {
        matches!(self, Self::Pinned { .. })
    }
}

impl PinRange {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    pub fn progress(&self, scroll_y: f64) -> Progress {
        Progress::from_ratio(scroll_y - self.start, self.length)
    }

    /// Inside the range the section is offset by the scrolled distance so it stays in place.
    pub fn pin_state(&self, scroll_y: f64) -> PinState {
        if scroll_y < self.start {
            PinState::Before
        } else if scroll_y > self.end() {
            PinState::After
        } else {
            PinState::Pinned {
                progress: self.progress(scroll_y),
                translate_y: Px(scroll_y - self.start),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pinned/story.rs"]
mod tests;
