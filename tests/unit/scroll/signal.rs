use super::*;

fn snap(offset: f64, viewport_height: f64) -> ScrollSnapshot {
    ScrollSnapshot {
        offset,
        viewport_height,
    }
}

fn offsets() -> impl Iterator<Item = f64> {
    (-20..=400).map(|i| f64::from(i) * 7.5)
}

#[test]
fn every_signal_is_clamped_and_monotone() {
    let set = SignalSet::default();
    for spec in [set.hero_fade, set.effect_opacity, set.indicator_fade] {
        let mut prev: Option<f64> = None;
        for s in offsets() {
            let v = spec.value(snap(s, 900.0));
            assert!((0.0..=1.0).contains(&v), "{v} out of range at {s}");
            if let Some(p) = prev {
                match spec.direction {
                    Direction::Rising => assert!(v >= p),
                    Direction::Falling => assert!(v <= p),
                }
            }
            prev = Some(v);
        }
    }
}

#[test]
fn effect_opacity_rests_before_and_saturates_after() {
    let spec = SignalSet::default().effect_opacity;
    assert_eq!(spec.value(snap(0.0, 900.0)), 0.0);
    assert_eq!(spec.value(snap(450.0, 900.0)), 0.0);
    assert_eq!(spec.value(snap(1080.0, 900.0)), 1.0);
    assert_eq!(spec.value(snap(5000.0, 900.0)), 1.0);
    let mid = spec.value(snap(765.0, 900.0));
    assert!((mid - 0.5).abs() < 1e-12);
}

#[test]
fn indicator_fade_falls_in_pixels() {
    let spec = SignalSet::default().indicator_fade;
    assert_eq!(spec.rest_value(), 1.0);
    assert_eq!(spec.value(snap(10.0, 300.0)), 1.0);
    assert_eq!(spec.value(snap(125.0, 300.0)), 0.5);
    assert_eq!(spec.value(snap(200.0, 300.0)), 0.0);
    // viewport height has no influence on pixel ranges
    assert_eq!(spec.value(snap(125.0, 2000.0)), 0.5);
}

#[test]
fn values_are_deterministic_per_snapshot() {
    let cfg = ScrollConfig::default();
    let a = cfg.evaluate(snap(700.0, 900.0));
    for _ in 0..1000 {
        cfg.evaluate(snap(123.0, 900.0));
    }
    let b = cfg.evaluate(snap(700.0, 900.0));
    assert_eq!(a, b);
}

#[test]
fn visibility_uses_threshold() {
    let cfg = ScrollConfig::default();
    // 0.005 opacity: 450 + 0.005 * 630
    assert!(!cfg.evaluate(snap(453.15, 900.0)).effect_visible);
    assert!(cfg.evaluate(snap(460.0, 900.0)).effect_visible);
}

#[test]
fn menu_pins_past_offset() {
    let cfg = ScrollConfig::default();
    assert!(!cfg.evaluate(snap(50.0, 900.0)).menu_pinned);
    assert!(cfg.evaluate(snap(51.0, 900.0)).menu_pinned);
}

#[test]
fn signal_is_linear_inside_its_range() {
    let spec = SignalSpec::rising(Distance::Px(0.0), Distance::Px(100.0));
    assert_eq!(spec.value(snap(25.0, 1.0)), 0.25);
    assert_eq!(spec.value(snap(75.0, 1.0)), 0.75);
    let spec = SignalSpec::falling(Distance::Px(100.0), Distance::Px(300.0));
    assert_eq!(spec.value(snap(150.0, 1.0)), 0.75);
}

#[test]
fn unknown_spec_fields_are_rejected() {
    let json = r#"{ "start": { "px": 0 }, "end": { "px": 10 }, "direction": "rising", "ease": "InOutQuad" }"#;
    assert!(serde_json::from_str::<SignalSpec>(json).is_err());
}

#[test]
fn reversed_range_is_rejected() {
    let cfg = ScrollConfig {
        signals: SignalSet {
            hero_fade: SignalSpec::falling(Distance::Vh(1.0), Distance::Vh(0.5)),
            ..SignalSet::default()
        },
        ..ScrollConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn threshold_must_be_below_one() {
    let cfg = ScrollConfig {
        effect_visible_threshold: 1.0,
        ..ScrollConfig::default()
    };
    assert!(cfg.validate().is_err());
}
