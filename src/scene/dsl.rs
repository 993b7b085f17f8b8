use crate::{
    animation::keyframes::{DisplayBand, KeyframeSet},
    animation::smoothing::Smoothing,
    foundation::core::Viewport,
    foundation::error::{StageError, StageResult},
    pinned::story::StoryConfig,
    reveal::{stagger::StaggerGroup, trigger::InViewTrigger},
    scene::model::{
        CardDeckSpec, MappedProperty, Page, RevealSpec, ScrollTransformSpec, Section, SectionKind,
    },
    scroll::offset::ScrollOffset,
    sequence::cards::DEFAULT_TRANSITION_FRACTION,
};

pub struct PageBuilder {
    viewport: Viewport,
    sections: Vec<Section>,
}

impl PageBuilder {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section) -> StageResult<Self> {
        if self.sections.iter().any(|s| s.id == section.id) {
            return Err(StageError::config(format!(
                "duplicate section id '{}'",
                section.id
            )));
        }
        self.sections.push(section);
        Ok(self)
    }

    pub fn card_deck(self, id: impl Into<String>, cards: usize) -> StageResult<Self> {
        self.section(card_deck(id, cards))
    }

    pub fn pinned_story(self, id: impl Into<String>, config: StoryConfig) -> StageResult<Self> {
        self.section(pinned_story(id, config))
    }

    pub fn scroll_transform(
        self,
        id: impl Into<String>,
        property: MappedProperty,
        keyframes: KeyframeSet<f64>,
    ) -> StageResult<Self> {
        self.section(scroll_transform(id, property, keyframes))
    }

    pub fn reveal(self, id: impl Into<String>, children: usize) -> StageResult<Self> {
        self.section(reveal(id, children))
    }

    pub fn build(self) -> StageResult<Page> {
        let page = Page {
            viewport: self.viewport,
            sections: self.sections,
        };
        page.validate()?;
        Ok(page)
    }
}

pub struct SectionBuilder {
    section: Section,
}

impl SectionBuilder {
    pub fn new(id: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            section: Section {
                id: id.into(),
                offset: ScrollOffset::default(),
                smoothing: None,
                kind,
            },
        }
    }

    pub fn offset(mut self, offset: ScrollOffset) -> Self {
        self.section.offset = offset;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.section.smoothing = Some(smoothing);
        self
    }

    pub fn build(self) -> Section {
        self.section
    }
}

pub fn card_deck(id: impl Into<String>, cards: usize) -> Section {
    SectionBuilder::new(
        id,
        SectionKind::CardDeck(CardDeckSpec {
            cards,
            transition_fraction: DEFAULT_TRANSITION_FRACTION,
            display_epsilon: DisplayBand::DEFAULT_EPSILON,
        }),
    )
    .build()
}

/// Pinned story with its scrub lag applied as smoothing.
pub fn pinned_story(id: impl Into<String>, config: StoryConfig) -> Section {
    let mut builder = SectionBuilder::new(id, SectionKind::PinnedStory(config));
    if config.scrub_secs > 0.0 {
        builder = builder.smoothing(Smoothing::Scrub {
            lag_secs: config.scrub_secs,
        });
    }
    builder.build()
}

/// Keyframed property tracked while the section crosses the viewport ("start end" to
/// "end start").
pub fn scroll_transform(
    id: impl Into<String>,
    property: MappedProperty,
    keyframes: KeyframeSet<f64>,
) -> Section {
    SectionBuilder::new(
        id,
        SectionKind::ScrollTransform(ScrollTransformSpec {
            property,
            keyframes,
            height_vh: 100.0,
        }),
    )
    .offset(ScrollOffset::crossing())
    .build()
}

pub fn reveal(id: impl Into<String>, children: usize) -> Section {
    SectionBuilder::new(
        id,
        SectionKind::Reveal(RevealSpec {
            children,
            trigger: InViewTrigger::default(),
            stagger: StaggerGroup::default(),
            height_vh: 100.0,
        }),
    )
    .build()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;
