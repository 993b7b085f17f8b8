use super::*;
use crate::{
    eval::evaluator::SectionFrame, pinned::story::StoryConfig, pinned::story::StoryPhase,
    scene::dsl::PageBuilder,
};

fn viewport() -> Viewport {
    Viewport::new(1440.0, 1000.0).unwrap()
}

fn page() -> Page {
    PageBuilder::new(viewport())
        .reveal("hero", 3)
        .unwrap()
        .card_deck("deck", 2)
        .unwrap()
        .pinned_story("story", StoryConfig::default())
        .unwrap()
        .build()
        .unwrap()
}

fn run_frames(host: &ScrollHost, n: usize) {
    for _ in 0..n {
        host.advance_frame(1.0 / 60.0);
    }
}

#[test]
fn unmount_releases_every_listener_and_frame() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();
    // Two per section plus the session's own resize and scroll listeners.
    assert_eq!(host.listener_count(), 2 * 3 + 2);

    host.scroll_to(4000.0);
    assert!(host.pending_frames() > 0, "scrubbed story is animating");

    session.unmount();
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frames(), 0);
    host.scroll_to(0.0);
    assert_eq!(host.advance_frame(1.0 / 60.0), 0);
}

#[test]
fn repeated_mounts_do_not_accumulate_listeners() {
    let host = ScrollHost::new(viewport());
    for _ in 0..5 {
        let session = StageSession::mount(&host, page()).unwrap();
        host.scroll_by(700.0);
        run_frames(&host, 3);
        drop(session);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_frames(), 0);
    }
}

#[test]
fn scrubbed_story_catches_up_and_settles() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();
    // hero [0, 1000], deck [1000, 3000] with range [1000, 2000], story [3000, 6500] with range
    // [3000, 5500].
    host.scroll_to(4250.0);
    assert_eq!(session.raw_progress(2).unwrap().get(), 0.5);
    assert!(session.progress(2).unwrap().get() < 0.5);
    assert!(!session.is_settled());

    run_frames(&host, 400);
    assert!(session.is_settled());
    assert_eq!(session.progress(2).unwrap().get(), 0.5);

    let frame = session.frame().unwrap();
    let SectionFrame::PinnedStory { pin, story } = &frame.sections[2].frame else {
        panic!("expected a pinned story frame");
    };
    assert!(pin.is_pinned());
    assert_eq!(story.phase, StoryPhase::Hold);
    assert_eq!(host.pending_frames(), 0);
}

#[test]
fn reveal_children_follow_the_clock() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();

    let children = |session: &StageSession| match &session.frame().unwrap().sections[0].frame {
        SectionFrame::Reveal { in_view, children } => {
            assert!(in_view);
            children.iter().map(|c| c.opacity).collect::<Vec<_>>()
        }
        _ => panic!("expected a reveal frame"),
    };

    // In view at mount, but the first child waits for the parent delay.
    assert!(children(&session).iter().all(|o| *o == 0.0));
    host.advance_frame(0.5);
    let mid = children(&session);
    assert!(mid[0] > mid[1] && mid[1] > 0.0);
    host.advance_frame(5.0);
    assert!(children(&session).iter().all(|o| *o == 1.0));
}

#[test]
fn resize_relayouts_sections() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();
    host.scroll_to(1500.0);
    assert_eq!(session.progress(1).unwrap().get(), 0.5);

    host.resize(Viewport::new(1440.0, 500.0).unwrap());
    // Deck now spans [500, 1500] with range [500, 1000].
    assert_eq!(
        session.element(1).unwrap().get(),
        Some(Rect::new(0.0, 500.0, 1440.0, 1500.0))
    );
    assert_eq!(session.progress(1).unwrap(), Progress::END);
}

#[test]
fn missing_section_element_reports_zero() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();
    session.element(1).unwrap().detach();
    host.scroll_to(2000.0);
    assert_eq!(session.progress(1).unwrap(), Progress::START);
    assert!(session.frame().is_ok());
}

#[test]
fn subscribers_receive_section_progress() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = session
        .subscribe(1, move |p| sink.borrow_mut().push(p.get()))
        .unwrap();
    host.scroll_to(1250.0);
    host.scroll_to(1500.0);
    assert_eq!(*seen.borrow(), vec![0.25, 0.5]);
    drop(sub);
    host.scroll_to(2500.0);
    assert_eq!(seen.borrow().len(), 2);
    assert!(session.subscribe(7, |_| {}).is_err());
}

#[test]
fn frame_after_host_drop_is_a_lifecycle_error() {
    let host = ScrollHost::new(viewport());
    let session = StageSession::mount(&host, page()).unwrap();
    drop(host);
    assert!(matches!(session.frame(), Err(StageError::Lifecycle(_))));
}
