use super::*;

#[test]
fn clip_inset_formats_and_interpolates() {
    let inset = ClipInset::new(10.0, 4.0, 48.0);
    assert_eq!(inset.to_string(), "inset(10% 4% 10% 4% round 48px)");
    assert_eq!(
        ClipInset::FULL.to_string(),
        "inset(0% 0% 0% 0% round 0px)"
    );

    let mid = ClipInset::lerp(&inset, &ClipInset::FULL, 0.5);
    assert_eq!(mid, ClipInset::new(5.0, 2.0, 24.0));
    assert!(ClipInset::lerp(&inset, &ClipInset::FULL, 1.0).is_full());
    assert!((inset.visible_fraction() - 0.92 * 0.8).abs() < 1e-12);
}

#[test]
fn filter_omits_identity_components() {
    assert_eq!(Filter::default().to_string(), "none");
    assert_eq!(Filter::blur(10.0).to_string(), "blur(10px)");
    let settled = Filter {
        grayscale: Percent(100.0),
        brightness: 0.7,
        ..Filter::default()
    };
    assert_eq!(settled.to_string(), "grayscale(100%) brightness(0.7)");
}

#[test]
fn transform_and_display_css() {
    let t = Transform {
        translate_y: Px(30.0),
        scale: 0.9,
    };
    assert_eq!(t.to_string(), "translateY(30px) scale(0.9)");
    assert_eq!(Display::None.as_css(), "none");
    assert!(Display::Flex.is_visible());
}

struct Probe;

impl ToCss for Probe {
    fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![("opacity", "1".to_string()), ("display", "flex".to_string())]
    }
}

#[test]
fn inline_style_joins_declarations() {
    assert_eq!(Probe.to_inline_style(), "opacity: 1; display: flex");
}
