//! scrollstage is a headless engine for scroll-driven animation choreography.
//!
//! It turns scroll geometry (scroll offset, viewport size, element bounds) into per-element style
//! values (opacity, transform, filter, clip-path, display) for a presentational layer to paint.
//! There is no renderer: styles are typed values that also print as CSS declarations.
//!
//! # Pipeline overview
//!
//! 1. **Track**: `scroll offset + element rect -> Progress` ([`ScrollOffset`],
//!    [`ScrollProgressSource`])
//! 2. **Smooth** (optional): spring or scrub catch-up between raw and published progress
//!    ([`Smoothing`])
//! 3. **Map**: `Progress -> styles` per section ([`CardSequencer`], [`PinnedStory`],
//!    [`KeyframeSet`], [`StaggerGroup`])
//! 4. **Paint boundary**: [`ToCss`] renders any style as inline CSS
//!
//! Two ways to drive a [`Page`]:
//!
//! - [`Evaluator`] is pure: a page and a scroll position in, a [`PageFrame`] out. It is
//!   `Send + Sync`, and [`sample_frames`] fans it out over `rayon`.
//! - [`StageSession`] mounts a page on a single-threaded [`ScrollHost`], owns one progress source
//!   per section and releases every listener and pending frame when dropped.
#![forbid(unsafe_code)]

mod animation;
mod eval;
mod foundation;
mod pinned;
mod pipeline;
mod reveal;
mod scene;
mod scroll;
mod sequence;
mod session;
mod style;

pub use animation::ease::Ease;
pub use animation::keyframes::{DisplayBand, Keyframe, KeyframeSet, Lerp};
pub use animation::smoothing::{ScrubFilter, Smoother, Smoothing, SpringConfig, SpringFilter};
pub use eval::evaluator::{
    EvaluatedSection, Evaluator, MappedValue, PageFrame, SectionContext, SectionFrame,
};
pub use eval::fingerprint::{FrameFingerprint, fingerprint_frame};
pub use foundation::core::{Percent, Progress, Px, Rect, Vec2, Viewport};
pub use foundation::error::{StageError, StageResult};
pub use pinned::story::{
    FadeStyle, ImageStyle, PinRange, PinState, PinnedStory, STORY_CONTENT, STORY_IMAGE,
    STORY_ITEMS, StoryConfig, StoryFrame, StoryPhase,
};
pub use pinned::timeline::{Position, Prop, PropValue, Timeline, TweenSpec};
pub use pipeline::{
    SampleReport, SampleStats, SampleThreading, SampledFrame, even_positions, sample_frames,
    sample_with,
};
pub use reveal::stagger::{RevealStyle, StaggerGroup};
pub use reveal::trigger::InViewTrigger;
pub use scene::dsl::{
    PageBuilder, SectionBuilder, card_deck, pinned_story, reveal, scroll_transform,
};
pub use scene::model::{
    CardDeckSpec, MappedProperty, Page, RevealSpec, ScrollTransformSpec, Section, SectionKind,
};
pub use scroll::host::{
    ElementRef, EventKind, FrameId, HostEvent, ListenerGuard, ListenerId, ScrollHost, WeakHost,
};
pub use scroll::offset::{Edge, OffsetPair, ScrollOffset};
pub use scroll::source::{ScrollProgressSource, Subscription};
pub use sequence::cards::{
    CardSequencer, CardSlot, CardStyle, DEFAULT_TRANSITION_FRACTION, DeckFrame, ProgressBar,
};
pub use sequence::phase::{PhaseRange, SlotStage};
pub use session::stage::StageSession;
pub use style::class::{merge_classes, merge_conditional};
pub use style::css::{ClipInset, Display, Filter, ToCss, Transform};
