use super::*;

const LANDING: &str = include_str!("../../data/landing_page.json");

#[test]
fn landing_fixture_parses_and_validates() {
    let page = Page::from_json(LANDING).unwrap();
    assert_eq!(page.sections.len(), 5);
    assert_eq!(page.section_index("features"), Some(2));
    match &page.sections[2].kind {
        SectionKind::CardDeck(spec) => {
            assert_eq!(spec.cards, 5);
            assert_eq!(spec.transition_fraction, 0.15);
            assert_eq!(spec.display_epsilon, 0.05);
        }
        other => panic!("unexpected kind {}", other.name()),
    }
    assert!(matches!(
        page.sections[1].smoothing,
        Some(Smoothing::Spring(_))
    ));
    assert_eq!(page.sections[0].offset, ScrollOffset::default());
}

#[test]
fn sections_stack_vertically() {
    let page = Page::from_json(LANDING).unwrap();
    let vp = page.viewport;
    let rects = page.layout(vp);
    assert_eq!(rects[0], Rect::new(0.0, 0.0, 1440.0, 900.0));
    assert_eq!(rects[1].y0, 900.0);
    // Five cards span five viewports.
    assert_eq!(rects[2].height(), 4500.0);
    // The pinned story adds its pin distance to its own height.
    assert_eq!(rects[3].height(), 900.0 * 3.5);
    assert_eq!(rects[4].height(), 540.0);
    for pair in rects.windows(2) {
        assert_eq!(pair[0].y1, pair[1].y0);
    }
    assert_eq!(page.document_height(vp), rects[4].y1);
    assert_eq!(page.max_scroll(vp), rects[4].y1 - 900.0);
}

#[test]
fn json_round_trip_preserves_page() {
    let page = Page::from_json(LANDING).unwrap();
    let json = page.to_json_pretty().unwrap();
    assert_eq!(Page::from_json(&json).unwrap(), page);
}

#[test]
fn invalid_pages_are_rejected() {
    let cases = [
        r#"{"sections": []}"#,
        r#"{"sections": [{"id": "a", "kind": "card_deck", "cards": 0}]}"#,
        r#"{"sections": [{"id": "a", "kind": "card_deck", "cards": 3, "transition_fraction": 0.5}]}"#,
        r#"{"sections": [{"id": "a", "kind": "card_deck", "cards": 3},
                         {"id": "a", "kind": "card_deck", "cards": 3}]}"#,
        r#"{"sections": [{"id": "a", "kind": "card_deck", "cards": 3, "offset": ["start", "end end"]}]}"#,
        r#"{"sections": [{"id": "a", "kind": "scroll_transform",
                          "keyframes": [{"at": 1.0, "value": 0.0}, {"at": 0.0, "value": 1.0}]}]}"#,
        r#"{"sections": [{"id": "a", "kind": "pinned_story", "scroll_length": -1}]}"#,
        r#"{"sections": [{"id": "a", "kind": "card_deck", "cards": 2,
                          "smoothing": {"kind": "scrub", "lag_secs": -1}}]}"#,
        r#"{"sections": [{"id": "a", "kind": "marquee"}]}"#,
    ];
    for case in cases {
        assert!(Page::from_json(case).is_err(), "accepted: {case}");
    }
}

#[test]
fn section_errors_name_the_section() {
    let err = Page::from_json(r#"{"sections": [{"id": "deck", "kind": "card_deck", "cards": 0}]}"#)
        .unwrap_err();
    assert!(matches!(err, StageError::Config(_)));
    assert!(err.to_string().contains("section 'deck'"));
}

#[test]
fn from_path_reports_missing_file() {
    let err = Page::from_path("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("failed to read page"));
}

#[test]
fn pinned_story_scrubs_by_default() {
    let page = Page::from_json(LANDING).unwrap();
    assert_eq!(
        page.sections[3].effective_smoothing(),
        Some(Smoothing::Scrub { lag_secs: 0.6 })
    );
    assert_eq!(page.sections[2].effective_smoothing(), None);
    assert!(matches!(
        page.sections[1].effective_smoothing(),
        Some(Smoothing::Spring(_))
    ));
}
