use crate::{
    foundation::core::{Progress, Px, Rect, Viewport, fmt_num},
    foundation::error::{StageError, StageResult},
    pinned::story::{PinState, PinnedStory, StoryFrame},
    reveal::stagger::RevealStyle,
    scene::model::{MappedProperty, Page, RevealSpec, ScrollTransformSpec, SectionKind},
    sequence::cards::{CardSequencer, DeckFrame},
    style::css::{Filter, ToCss, Transform},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Styles for every section at one scroll position.
pub struct PageFrame {
    /// Scroll offset the frame was evaluated at.
    pub scroll_y: f64,
    /// Sections in document order.
    pub sections: Vec<EvaluatedSection>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One evaluated section.
pub struct EvaluatedSection {
    /// Section identifier.
    pub id: String,
    /// Progress the section was evaluated at (smoothed when live).
    pub progress: Progress,
    /// Section styles.
    pub frame: SectionFrame,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Evaluated styles, by section kind.
pub enum SectionFrame {
    CardDeck(DeckFrame),
    PinnedStory {
        pin: PinState,
        story: StoryFrame,
    },
    ScrollTransform(MappedValue),
    Reveal {
        in_view: bool,
        children: Vec<RevealStyle>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// A keyframed property value at one progress.
pub struct MappedValue {
    pub property: MappedProperty,
    pub value: f64,
}

impl ToCss for MappedValue {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        let css = match self.property {
            MappedProperty::Opacity => fmt_num(self.value),
            MappedProperty::Scale => format!("scale({})", fmt_num(self.value)),
            MappedProperty::TranslateY => Transform {
                translate_y: Px(self.value),
                scale: 1.0,
            }
            .to_string(),
            MappedProperty::Blur => Filter::blur(self.value).to_string(),
        };
        vec![(self.property.css_name(), css)]
    }
}

/// Inputs for evaluating one section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionContext {
    /// Progress to evaluate at (raw or smoothed).
    pub progress: Progress,
    pub scroll_y: f64,
    pub viewport: Viewport,
    /// The section's document rect in `viewport`.
    pub rect: Rect,
    /// Seconds since a reveal section entered view, `None` while it has not.
    pub reveal_elapsed: Option<f64>,
}

#[derive(Clone, Debug)]
enum CompiledSection {
    CardDeck(CardSequencer),
    PinnedStory(PinnedStory),
    ScrollTransform(ScrollTransformSpec),
    Reveal(RevealSpec),
}

/// Pure evaluator from page and scroll position to section styles.
///
/// Construction validates the page and builds each section's choreography once; evaluation
/// never mutates, so one evaluator can be shared across threads.
#[derive(Clone, Debug)]
pub struct Evaluator {
    page: Page,
    sections: Vec<CompiledSection>,
}

impl Evaluator {
    #[tracing::instrument(skip(page), fields(sections = page.sections.len()))]
    pub fn new(page: Page) -> StageResult<Self> {
        page.validate()?;
        let sections = page
            .sections
            .iter()
            .map(|section| {
                let compiled = match &section.kind {
                    SectionKind::CardDeck(spec) => {
                        CompiledSection::CardDeck(CardSequencer::with_display_epsilon(
                            spec.cards,
                            spec.transition_fraction,
                            spec.display_epsilon,
                        )?)
                    }
                    SectionKind::PinnedStory(config) => {
                        CompiledSection::PinnedStory(PinnedStory::new(*config)?)
                    }
                    SectionKind::ScrollTransform(spec) => {
                        CompiledSection::ScrollTransform(spec.clone())
                    }
                    SectionKind::Reveal(spec) => CompiledSection::Reveal(*spec),
                };
                Ok(compiled)
            })
            .collect::<StageResult<Vec<_>>>()?;
        Ok(Self { page, sections })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Raw progress of section `index` at `scroll_y`.
    pub fn section_progress(
        &self,
        index: usize,
        scroll_y: f64,
        viewport: Viewport,
    ) -> StageResult<Progress> {
        let section = self.section(index)?;
        let rect = self.section_rect(index, viewport)?;
        Ok(section.offset.progress(scroll_y, rect, viewport))
    }

    pub fn section_rect(&self, index: usize, viewport: Viewport) -> StageResult<Rect> {
        self.page
            .layout(viewport)
            .get(index)
            .copied()
            .ok_or_else(|| out_of_bounds(index))
    }

    fn section(&self, index: usize) -> StageResult<&crate::scene::model::Section> {
        self.page.sections.get(index).ok_or_else(|| out_of_bounds(index))
    }

    #[tracing::instrument(level = "trace", skip(self, ctx), fields(progress = ctx.progress.get()))]
    pub fn eval_section(&self, index: usize, ctx: &SectionContext) -> StageResult<SectionFrame> {
        let compiled = self.sections.get(index).ok_or_else(|| out_of_bounds(index))?;
        let p = ctx.progress;
        Ok(match compiled {
            CompiledSection::CardDeck(deck) => SectionFrame::CardDeck(deck.frame(p)),
            CompiledSection::PinnedStory(story) => SectionFrame::PinnedStory {
                pin: story.pin_range(ctx.rect, ctx.viewport).pin_state(ctx.scroll_y),
                story: story.frame(p),
            },
            CompiledSection::ScrollTransform(spec) => SectionFrame::ScrollTransform(MappedValue {
                property: spec.property,
                value: spec.keyframes.sample_progress(p),
            }),
            CompiledSection::Reveal(spec) => SectionFrame::Reveal {
                in_view: ctx.reveal_elapsed.is_some(),
                children: spec.stagger.styles(spec.children, ctx.reveal_elapsed),
            },
        })
    }

    /// Evaluate every section at `scroll_y` in the page's own viewport.
    #[tracing::instrument(skip(self))]
    pub fn eval_page(&self, scroll_y: f64) -> StageResult<PageFrame> {
        self.eval_page_in(scroll_y, self.page.viewport)
    }

    /// Evaluate every section from raw progress, as if scrolled straight down to `scroll_y`:
    /// reveal sections that have been reached show their settled state.
    pub fn eval_page_in(&self, scroll_y: f64, viewport: Viewport) -> StageResult<PageFrame> {
        let layout = self.page.layout(viewport);
        let mut sections = Vec::with_capacity(self.sections.len());
        let rows = self.page.sections.iter().zip(&self.sections).zip(layout);
        for (index, ((section, compiled), rect)) in rows.enumerate() {
            let reveal_elapsed = match compiled {
                CompiledSection::Reveal(spec) => {
                    let shown = if spec.trigger.once {
                        spec.trigger.reached(rect, scroll_y, viewport)
                    } else {
                        spec.trigger.intersects(rect, scroll_y, viewport)
                    };
                    shown.then(|| spec.stagger.total_duration(spec.children))
                }
                _ => None,
            };
            let ctx = SectionContext {
                progress: section.offset.progress(scroll_y, rect, viewport),
                scroll_y,
                viewport,
                rect,
                reveal_elapsed,
            };
            sections.push(EvaluatedSection {
                id: section.id.clone(),
                progress: ctx.progress,
                frame: self.eval_section(index, &ctx)?,
            });
        }
        Ok(PageFrame { scroll_y, sections })
    }
}

fn out_of_bounds(index: usize) -> StageError {
    StageError::evaluation(format!("section index {index} is out of bounds"))
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
