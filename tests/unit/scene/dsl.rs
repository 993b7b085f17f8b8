use super::*;
use crate::animation::keyframes::Keyframe;

fn pulse() -> KeyframeSet<f64> {
    KeyframeSet::linear(&[0.0, 0.5, 1.0], vec![0.85, 1.15, 0.85]).unwrap()
}

#[test]
fn builder_produces_valid_page() {
    let page = PageBuilder::new(Viewport::default())
        .reveal("hero", 4)
        .unwrap()
        .card_deck("features", 5)
        .unwrap()
        .pinned_story("story", StoryConfig::default())
        .unwrap()
        .scroll_transform("band", MappedProperty::Scale, pulse())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(page.sections.len(), 4);
    assert_eq!(
        page.sections[2].smoothing,
        Some(Smoothing::Scrub { lag_secs: 0.6 })
    );
    assert_eq!(page.sections[3].offset, ScrollOffset::crossing());
    assert_eq!(page.sections[1].offset, ScrollOffset::default());
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = PageBuilder::new(Viewport::default())
        .card_deck("a", 2)
        .unwrap()
        .card_deck("a", 3);
    assert!(err.is_err());
}

#[test]
fn build_validates_sections() {
    let bad = KeyframeSet::<f64>::new(vec![Keyframe::new(0.0, 1.0)]).unwrap();
    let page = PageBuilder::new(Viewport::default())
        .section(
            SectionBuilder::new(
                "t",
                SectionKind::ScrollTransform(ScrollTransformSpec {
                    property: MappedProperty::Opacity,
                    keyframes: bad,
                    height_vh: 0.0,
                }),
            )
            .build(),
        )
        .unwrap()
        .build();
    assert!(page.is_err());

    assert!(PageBuilder::new(Viewport::default()).build().is_err());
}

#[test]
fn unscrubbed_story_has_no_smoothing() {
    let section = pinned_story(
        "s",
        StoryConfig {
            scrub_secs: 0.0,
            ..StoryConfig::default()
        },
    );
    assert!(section.smoothing.is_none());
}
