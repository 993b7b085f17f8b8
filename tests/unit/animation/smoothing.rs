use super::*;

fn run(s: &mut dyn Smoother, frames: usize, dt: f64) -> f64 {
    for _ in 0..frames {
        s.step(dt);
    }
    s.value()
}

#[test]
fn spring_converges_to_target_and_settles() {
    let mut spring = SpringFilter::new(SpringConfig::SCROLL, 0.0).unwrap();
    spring.set_target(1.0);
    assert!(!spring.is_settled());
    let v = run(&mut spring, 600, 1.0 / 60.0);
    assert_eq!(v, 1.0);
    assert!(spring.is_settled());
    assert_eq!(spring.velocity(), 0.0);
}

#[test]
fn spring_lags_behind_raw_target() {
    let mut spring = SpringFilter::new(SpringConfig::SCROLL, 0.0).unwrap();
    spring.set_target(1.0);
    let first = spring.step(1.0 / 60.0);
    assert!(first > 0.0 && first < 1.0);
}

#[test]
fn overdamped_scroll_spring_does_not_overshoot() {
    assert!(SpringConfig::SCROLL.damping_ratio() > 1.0);
    let mut spring = SpringFilter::new(SpringConfig::SCROLL, 0.0).unwrap();
    spring.set_target(1.0);
    for _ in 0..600 {
        let v = spring.step(1.0 / 60.0);
        assert!(v <= 1.0 + 1e-12);
    }
}

#[test]
fn tiny_target_changes_are_suppressed() {
    let mut spring = SpringFilter::new(SpringConfig::SCROLL, 0.5).unwrap();
    spring.set_target(0.5005);
    assert!(spring.is_settled());
    assert_eq!(spring.value(), 0.5005);
}

#[test]
fn non_finite_targets_are_ignored() {
    let mut spring = SpringFilter::new(SpringConfig::default(), 0.25).unwrap();
    spring.set_target(f64::NAN);
    assert_eq!(spring.target(), 0.25);
    assert!(spring.is_settled());
}

#[test]
fn large_frames_stay_finite() {
    let mut spring = SpringFilter::new(SpringConfig::default(), 0.0).unwrap();
    spring.set_target(1.0);
    let v = spring.step(0.5);
    assert!(v.is_finite());
    assert!(spring.velocity().is_finite());
}

#[test]
fn reset_jumps_without_motion() {
    let mut spring = SpringFilter::new(SpringConfig::default(), 0.0).unwrap();
    spring.set_target(1.0);
    spring.step(1.0 / 60.0);
    spring.reset(0.3);
    assert!(spring.is_settled());
    assert_eq!(spring.step(1.0 / 60.0), 0.3);
}

#[test]
fn rejects_invalid_spring_config() {
    let bad = SpringConfig {
        stiffness: 0.0,
        ..SpringConfig::default()
    };
    assert!(SpringFilter::new(bad, 0.0).is_err());
    let bad = SpringConfig {
        mass: -1.0,
        ..SpringConfig::default()
    };
    assert!(bad.validate().is_err());
    let undamped = SpringConfig {
        damping: 0.0,
        ..SpringConfig::default()
    };
    assert!(undamped.validate().is_err());
}

#[test]
fn stiff_critically_damped_spring_settles() {
    let cfg = SpringConfig {
        stiffness: 1e6,
        damping: 2000.0,
        mass: 1.0,
        rest_delta: 0.001,
        rest_speed: 0.01,
    };
    assert!((cfg.damping_ratio() - 1.0).abs() < 1e-12);
    let mut spring = SpringFilter::new(cfg, 0.0).unwrap();
    spring.set_target(1.0);
    for _ in 0..120 {
        let v = spring.step(1.0 / 60.0);
        assert!(v.is_finite());
        assert!((-1e-9..=1.0 + 1e-9).contains(&v), "{v}");
    }
    assert!(spring.is_settled());
    assert_eq!(spring.value(), 1.0);
}

#[test]
fn stiff_underdamped_spring_converges() {
    let cfg = SpringConfig {
        stiffness: 1e6,
        damping: 50.0,
        mass: 1.0,
        rest_delta: 0.001,
        rest_speed: 0.01,
    };
    let mut spring = SpringFilter::new(cfg, 0.0).unwrap();
    spring.set_target(1.0);
    let v = run(&mut spring, 600, 1.0 / 60.0);
    assert!(v.is_finite());
    assert!(spring.is_settled());
    assert_eq!(v, 1.0);
}

#[test]
fn step_length_does_not_change_trajectory() {
    let mut fine = SpringFilter::new(SpringConfig::SCROLL, 0.0).unwrap();
    let mut coarse = SpringFilter::new(SpringConfig::SCROLL, 0.0).unwrap();
    fine.set_target(1.0);
    coarse.set_target(1.0);
    run(&mut fine, 8, 1.0 / 240.0);
    coarse.step(1.0 / 30.0);
    assert!((fine.value() - coarse.value()).abs() < 1e-9);
}

#[test]
fn scrub_catches_up_over_lag() {
    let mut scrub = ScrubFilter::new(0.6, 0.0).unwrap();
    scrub.set_target(1.0);
    let v = scrub.step(0.3);
    assert!((v - 0.5).abs() < 1e-12);
    let v = run(&mut scrub, 400, 1.0 / 60.0);
    assert_eq!(v, 1.0);
    assert!(scrub.is_settled());

    let mut instant = ScrubFilter::new(0.0, 0.0).unwrap();
    instant.set_target(0.7);
    assert_eq!(instant.step(1.0 / 60.0), 0.7);
    assert!(ScrubFilter::new(-1.0, 0.0).is_err());
}

#[test]
fn smoothing_config_deserializes_tagged() {
    let s: Smoothing = serde_json::from_str(
        r#"{"kind":"spring","stiffness":100,"damping":30,"rest_delta":0.001}"#,
    )
    .unwrap();
    match s {
        Smoothing::Spring(cfg) => {
            assert_eq!(cfg.mass, 1.0);
            assert_eq!(cfg.rest_delta, 0.001);
        }
        Smoothing::Scrub { .. } => panic!("expected spring"),
    }
    let s: Smoothing = serde_json::from_str(r#"{"kind":"scrub","lag_secs":0.6}"#).unwrap();
    assert!(s.validate().is_ok());
    let boxed = s.build(0.2).unwrap();
    assert_eq!(boxed.value(), 0.2);
}
