use super::*;

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn position_parsing() {
    assert_eq!(Position::parse("").unwrap(), Position::Append);
    assert_eq!(Position::parse("-=0.5").unwrap(), Position::FromEnd(-0.5));
    assert_eq!(Position::parse("+=1").unwrap(), Position::FromEnd(1.0));
    assert_eq!(Position::parse("<").unwrap(), Position::FromPreviousStart(0.0));
    assert_eq!(
        Position::parse("<+=0.1").unwrap(),
        Position::FromPreviousStart(0.1)
    );
    assert_eq!(Position::parse(">-=0.2").unwrap(), Position::FromPreviousEnd(-0.2));
    assert_eq!(Position::parse("2.5").unwrap(), Position::At(2.5));
    assert!(Position::parse("<0.1").is_err());
    assert!(Position::parse("later").is_err());
}

#[test]
fn positions_resolve_against_previous_and_end() {
    let mut tl = Timeline::new();
    tl.set("a", Prop::Opacity, PropValue::Scalar(0.0)).unwrap();
    tl.set("b", Prop::Opacity, PropValue::Scalar(0.0)).unwrap();

    let s0 = tl
        .to(&["a"], &[(Prop::Opacity, PropValue::Scalar(1.0))], TweenSpec::new(2.0))
        .unwrap();
    let s1 = tl
        .to(
            &["b"],
            &[(Prop::Opacity, PropValue::Scalar(1.0))],
            TweenSpec::new(1.0).at(Position::FromEnd(-0.5)),
        )
        .unwrap();
    let s2 = tl.hold(1.0, Position::FromPreviousStart(0.25)).unwrap();
    approx(s0, 0.0);
    approx(s1, 1.5);
    approx(s2, 1.75);
    approx(tl.duration(), 2.75);

    let s3 = tl.hold(0.5, Position::At(10.0)).unwrap();
    approx(s3, 10.0);
    approx(tl.duration(), 10.5);
}

#[test]
fn to_tween_starts_from_value_at_its_start() {
    let mut tl = Timeline::new();
    tl.set("x", Prop::TranslateY, PropValue::Scalar(48.0)).unwrap();
    tl.to(
        &["x"],
        &[(Prop::TranslateY, PropValue::Scalar(0.0))],
        TweenSpec::new(1.0).ease(Ease::Linear),
    )
    .unwrap();
    tl.to(
        &["x"],
        &[(Prop::TranslateY, PropValue::Scalar(-40.0))],
        TweenSpec::new(1.0).ease(Ease::Linear),
    )
    .unwrap();

    approx(tl.scalar("x", Prop::TranslateY, -1.0).unwrap(), 48.0);
    approx(tl.scalar("x", Prop::TranslateY, 0.5).unwrap(), 24.0);
    approx(tl.scalar("x", Prop::TranslateY, 1.0).unwrap(), 0.0);
    approx(tl.scalar("x", Prop::TranslateY, 1.5).unwrap(), -20.0);
    approx(tl.scalar("x", Prop::TranslateY, 9.0).unwrap(), -40.0);
}

#[test]
fn from_tween_renders_immediately_and_lands_on_base() {
    let mut tl = Timeline::new();
    tl.set("c", Prop::Opacity, PropValue::Scalar(1.0)).unwrap();
    tl.hold(1.0, Position::Append).unwrap();
    tl.from(
        &["c"],
        &[(Prop::Opacity, PropValue::Scalar(0.0))],
        TweenSpec::new(1.0).ease(Ease::Linear),
    )
    .unwrap();

    approx(tl.scalar("c", Prop::Opacity, 0.0).unwrap(), 0.0);
    approx(tl.scalar("c", Prop::Opacity, 1.5).unwrap(), 0.5);
    approx(tl.scalar("c", Prop::Opacity, 2.0).unwrap(), 1.0);
}

#[test]
fn stagger_offsets_each_target() {
    let mut tl = Timeline::new();
    for t in ["a", "b", "c"] {
        tl.set(t, Prop::Opacity, PropValue::Scalar(1.0)).unwrap();
    }
    tl.from(
        &["a", "b", "c"],
        &[(Prop::Opacity, PropValue::Scalar(0.0))],
        TweenSpec::new(1.0).ease(Ease::Linear).stagger(0.5),
    )
    .unwrap();
    approx(tl.duration(), 2.0);
    approx(tl.scalar("a", Prop::Opacity, 0.5).unwrap(), 0.5);
    approx(tl.scalar("b", Prop::Opacity, 0.5).unwrap(), 0.0);
    approx(tl.scalar("c", Prop::Opacity, 1.5).unwrap(), 0.5);

    // ">" refers to the end of the whole staggered group.
    let next = tl.hold(0.1, Position::FromPreviousEnd(0.0)).unwrap();
    approx(next, 2.0);
}

#[test]
fn clip_values_interpolate_componentwise() {
    let mut tl = Timeline::new();
    tl.set("img", Prop::Clip, PropValue::Clip(ClipInset::new(10.0, 4.0, 48.0)))
        .unwrap();
    tl.to(
        &["img"],
        &[(Prop::Clip, PropValue::Clip(ClipInset::FULL))],
        TweenSpec::new(2.0).ease(Ease::Linear),
    )
    .unwrap();
    let mid = tl.clip("img", Prop::Clip, 1.0).unwrap();
    approx(mid.top.0, 5.0);
    approx(mid.right.0, 2.0);
    approx(mid.radius.0, 24.0);
    assert!(tl.clip("img", Prop::Clip, 2.0).unwrap().is_full());
}

#[test]
fn invalid_tweens_are_rejected() {
    let mut tl = Timeline::new();
    assert!(tl.set("x", Prop::Clip, PropValue::Scalar(1.0)).is_err());
    assert!(
        tl.to(&["x"], &[(Prop::Opacity, PropValue::Scalar(1.0))], TweenSpec::new(1.0))
            .is_err(),
        "no base value to start from"
    );
    tl.set("x", Prop::Opacity, PropValue::Scalar(0.0)).unwrap();
    assert!(
        tl.to(&["x"], &[(Prop::Opacity, PropValue::Scalar(1.0))], TweenSpec::new(-1.0))
            .is_err()
    );
    assert!(tl.value("missing", Prop::Scale, 0.0).is_none());
}
