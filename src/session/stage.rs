use std::{cell::RefCell, rc::Rc};

use crate::{
    eval::evaluator::{EvaluatedSection, Evaluator, PageFrame, SectionContext},
    foundation::core::{Progress, Rect, Viewport},
    foundation::error::{StageError, StageResult},
    reveal::trigger::InViewTrigger,
    scene::model::{Page, SectionKind},
    scroll::host::{ElementRef, EventKind, ListenerGuard, ScrollHost, WeakHost},
    scroll::source::{ScrollProgressSource, Subscription},
};

type Triggers = Rc<RefCell<Vec<Option<InViewTrigger>>>>;

/// A page mounted on a live host: one element and one progress source per section.
///
/// Sections never share animation state. Dropping the session (or calling
/// [`StageSession::unmount`]) releases every listener and pending frame it registered.
pub struct StageSession {
    host: WeakHost,
    evaluator: Evaluator,
    elements: Vec<ElementRef>,
    triggers: Triggers,
    sources: Vec<ScrollProgressSource>,
    guards: Vec<ListenerGuard>,
}

impl StageSession {
    pub fn mount(host: &ScrollHost, page: Page) -> StageResult<Self> {
        Self::mount_evaluator(host, Evaluator::new(page)?)
    }

    #[tracing::instrument(skip(host, evaluator), fields(sections = evaluator.section_count()))]
    pub fn mount_evaluator(host: &ScrollHost, evaluator: Evaluator) -> StageResult<Self> {
        let page = evaluator.page();
        let elements: Vec<ElementRef> = page
            .layout(host.viewport())
            .into_iter()
            .map(ElementRef::attached)
            .collect();
        let triggers: Triggers = Rc::new(RefCell::new(
            page.sections
                .iter()
                .map(|s| match &s.kind {
                    SectionKind::Reveal(spec) => Some(spec.trigger),
                    _ => None,
                })
                .collect(),
        ));

        // Registered before the sources so they see the new layout when a resize dispatches.
        let on_resize = {
            let page = page.clone();
            let elements = elements.clone();
            let triggers = Rc::clone(&triggers);
            let weak = host.downgrade();
            host.add_listener(EventKind::Resize, move |event| {
                for (element, rect) in elements.iter().zip(page.layout(event.viewport)) {
                    if element.is_attached() {
                        element.attach(rect);
                    }
                }
                observe_triggers(&weak, &triggers, &elements, event.scroll_y, event.viewport);
            })
        };
        let on_scroll = {
            let elements = elements.clone();
            let triggers = Rc::clone(&triggers);
            let weak = host.downgrade();
            host.add_listener(EventKind::Scroll, move |event| {
                observe_triggers(&weak, &triggers, &elements, event.scroll_y, event.viewport);
            })
        };
        observe_triggers(
            &host.downgrade(),
            &triggers,
            &elements,
            host.scroll_y(),
            host.viewport(),
        );

        let sources = page
            .sections
            .iter()
            .zip(&elements)
            .map(|(section, element)| {
                ScrollProgressSource::attach(
                    host,
                    element.clone(),
                    section.offset,
                    section.effective_smoothing(),
                )
                .map_err(|e| e.context(format!("section '{}'", section.id)))
            })
            .collect::<StageResult<Vec<_>>>()?;

        tracing::debug!(sections = sources.len(), "stage session mounted");
        Ok(Self {
            host: host.downgrade(),
            evaluator,
            elements,
            triggers,
            sources,
            guards: vec![on_resize, on_scroll],
        })
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn section_count(&self) -> usize {
        self.sources.len()
    }

    fn source(&self, index: usize) -> StageResult<&ScrollProgressSource> {
        self.sources.get(index).ok_or_else(|| {
            StageError::evaluation(format!("section index {index} is out of bounds"))
        })
    }

    /// Published (possibly smoothed) progress of section `index`.
    pub fn progress(&self, index: usize) -> StageResult<Progress> {
        Ok(self.source(index)?.progress())
    }

    pub fn raw_progress(&self, index: usize) -> StageResult<Progress> {
        Ok(self.source(index)?.raw_progress())
    }

    pub fn element(&self, index: usize) -> Option<ElementRef> {
        self.elements.get(index).cloned()
    }

    pub fn subscribe(
        &self,
        index: usize,
        f: impl Fn(Progress) + 'static,
    ) -> StageResult<Subscription> {
        Ok(self.source(index)?.subscribe(f))
    }

    /// Whether every smoothed section has reached its target.
    pub fn is_settled(&self) -> bool {
        self.sources.iter().all(ScrollProgressSource::is_settled)
    }

    /// Styles of every section at the host's current state.
    pub fn frame(&self) -> StageResult<PageFrame> {
        let host = self
            .host
            .upgrade()
            .ok_or_else(|| StageError::lifecycle("scroll host dropped before frame"))?;
        let scroll_y = host.scroll_y();
        let viewport = host.viewport();
        let clock = host.clock_secs();
        let triggers = self.triggers.borrow();

        let rows = self
            .evaluator
            .page()
            .sections
            .iter()
            .zip(&self.sources)
            .zip(&self.elements);
        let mut sections = Vec::with_capacity(self.sources.len());
        for (index, ((section, source), element)) in rows.enumerate() {
            let progress = source.progress();
            let ctx = SectionContext {
                progress,
                scroll_y,
                viewport,
                rect: element.get().unwrap_or(Rect::ZERO),
                reveal_elapsed: triggers
                    .get(index)
                    .copied()
                    .flatten()
                    .and_then(|t| t.elapsed(clock)),
            };
            sections.push(EvaluatedSection {
                id: section.id.clone(),
                progress,
                frame: self.evaluator.eval_section(index, &ctx)?,
            });
        }
        Ok(PageFrame { scroll_y, sections })
    }

    /// Release every listener and pending frame. Equivalent to dropping the session.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for StageSession {
    fn drop(&mut self) {
        self.guards.clear();
        self.sources.clear();
        tracing::debug!("stage session unmounted");
    }
}

fn observe_triggers(
    host: &WeakHost,
    triggers: &Triggers,
    elements: &[ElementRef],
    scroll_y: f64,
    viewport: Viewport,
) {
    let now = host.upgrade().map_or(0.0, |h| h.clock_secs());
    let mut triggers = triggers.borrow_mut();
    for (trigger, element) in triggers.iter_mut().zip(elements) {
        if let Some(trigger) = trigger {
            trigger.observe(element.get(), scroll_y, viewport, now);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/stage.rs"]
mod tests;
