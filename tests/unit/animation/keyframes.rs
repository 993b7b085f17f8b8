use super::*;

fn opacity_curve() -> KeyframeSet<f64> {
    KeyframeSet::<f64>::linear(&[0.2, 0.23, 0.37, 0.4], vec![0.0, 1.0, 1.0, 0.0]).unwrap()
}

#[test]
fn clamps_outside_covered_positions() {
    let kf = opacity_curve();
    assert_eq!(kf.sample(0.0), 0.0);
    assert_eq!(kf.sample(0.2), 0.0);
    assert_eq!(kf.sample(0.4), 0.0);
    assert_eq!(kf.sample(1.0), 0.0);
    assert_eq!(kf.sample(f64::NAN), 0.0);
}

#[test]
fn interpolates_between_bracketing_pair() {
    let kf = KeyframeSet::<f64>::linear(&[0.0, 10.0], vec![0.0, 10.0]).unwrap();
    assert_eq!(kf.sample(5.0), 5.0);
    assert_eq!(kf.sample(2.5), 2.5);

    let scale = KeyframeSet::<f64>::linear(&[0.0, 0.5, 1.0], vec![0.85, 1.15, 0.85]).unwrap();
    assert!((scale.sample(0.25) - 1.0).abs() < 1e-12);
    assert!((scale.sample(0.5) - 1.15).abs() < 1e-12);
}

#[test]
fn never_overshoots_declared_range() {
    let sets = [
        opacity_curve(),
        KeyframeSet::<f64>::linear(&[0.0, 0.03, 0.17, 0.2], vec![0.9, 1.0, 1.0, 1.1]).unwrap(),
        KeyframeSet::<f64>::linear(&[0.0, 0.03, 0.17, 0.2], vec![10.0, 0.0, 0.0, 10.0]).unwrap(),
    ];
    for kf in sets {
        let (lo, hi) = kf.value_bounds();
        for i in 0..=1000 {
            let v = kf.sample(f64::from(i) / 1000.0);
            assert!(v >= lo && v <= hi, "{v} outside [{lo}, {hi}]");
        }
    }
}

#[test]
fn sampling_is_idempotent() {
    let kf = opacity_curve();
    for i in 0..=100 {
        let x = f64::from(i) / 100.0;
        assert_eq!(kf.sample(x).to_bits(), kf.sample(x).to_bits());
    }
}

#[test]
fn zero_width_segment_jumps_to_later_value() {
    let kf = KeyframeSet::<f64>::linear(&[0.0, 0.5, 0.5, 1.0], vec![0.0, 1.0, 5.0, 6.0]).unwrap();
    assert_eq!(kf.sample(0.5), 5.0);
    assert!((kf.sample(0.25) - 0.5).abs() < 1e-12);
    assert!((kf.sample(0.75) - 5.5).abs() < 1e-12);
}

#[test]
fn pixel_values_and_derived_strings() {
    let y = KeyframeSet::linear(&[0.0, 1.0], vec![Px(30.0), Px(-30.0)]).unwrap();
    assert_eq!(y.sample(0.5), Px(0.0));
    assert_eq!(y.sample(0.0).to_string(), "30px");

    let blur = KeyframeSet::<f64>::linear(&[0.0, 1.0], vec![10.0, 0.0]).unwrap();
    let filter = blur.sample_map(0.5, |r| format!("blur({}px)", r));
    assert_eq!(filter, "blur(5px)");
}

#[test]
fn segment_ease_remaps_local_t() {
    let kf = KeyframeSet::<f64>::linear(&[0.0, 1.0], vec![0.0, 1.0])
        .unwrap()
        .with_ease(Ease::InQuad);
    assert!((kf.sample(0.5) - 0.25).abs() < 1e-12);
}

#[test]
fn rejects_invalid_key_sets() {
    assert!(KeyframeSet::<f64>::new(vec![]).is_err());
    assert!(KeyframeSet::<f64>::linear(&[0.5, 0.2], vec![0.0, 1.0]).is_err());
    assert!(KeyframeSet::<f64>::linear(&[0.0, f64::NAN], vec![0.0, 1.0]).is_err());
    assert!(KeyframeSet::<f64>::linear(&[0.0], vec![0.0, 1.0]).is_err());
}

#[test]
fn json_roundtrip_validates() {
    let kf: KeyframeSet<f64> =
        serde_json::from_str(r#"[{"at":0.0,"value":1.0},{"at":1.0,"value":0.98}]"#).unwrap();
    assert!((kf.sample(0.5) - 0.99).abs() < 1e-12);

    let bad = serde_json::from_str::<KeyframeSet<f64>>(
        r#"[{"at":1.0,"value":1.0},{"at":0.0,"value":0.98}]"#,
    );
    assert!(bad.is_err());
}

#[test]
fn display_band_widens_by_epsilon() {
    let band = DisplayBand::new(0.2, 0.4);
    assert_eq!(band.sample(0.1), Display::None);
    assert_eq!(band.sample(0.16), Display::Flex);
    assert_eq!(band.sample(0.3), Display::Flex);
    assert_eq!(band.sample(0.44), Display::Flex);
    assert_eq!(band.sample(0.5), Display::None);
}

#[test]
fn keyframe_eases_read_from_notation() {
    let kf: KeyframeSet<f64> = serde_json::from_str(
        r#"[{"at": 0.0, "value": 0.0, "ease": "power1.in"}, {"at": 1.0, "value": 1.0}]"#,
    )
    .unwrap();
    assert_eq!(kf.keys()[0].ease, Ease::InQuad);
    assert_eq!(kf.keys()[1].ease, Ease::Linear);
    assert!((kf.sample(0.5) - 0.25).abs() < 1e-12);
}
