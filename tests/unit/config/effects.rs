use super::*;
use crate::config::model::EffectInstance;
use serde_json::json;

fn inst(v: serde_json::Value) -> EffectInstance {
    serde_json::from_value(v).unwrap()
}

#[test]
fn fade_defaults_and_easing() {
    let fx = parse_effect(&inst(json!({ "type": "fade" }))).unwrap();
    assert_eq!(
        fx,
        EffectKind::Fade {
            from: 0.0,
            to: 1.0,
            duration_ms: 1000.0,
            looped: true,
            easing: Easing::Linear,
        }
    );

    let fx = parse_effect(&inst(json!({
        "type": "fade", "from": 0.3, "to": 0.9, "durationMs": 500.0,
        "loop": false, "easing": "sine-in-out"
    })))
    .unwrap();
    assert!(matches!(
        fx,
        EffectKind::Fade {
            looped: false,
            easing: Easing::SineInOut,
            ..
        }
    ));

    assert!(parse_effect(&inst(json!({ "type": "fade", "durationMs": 0.0 }))).is_err());
    assert!(parse_effect(&inst(json!({ "type": "fade", "easing": "bounce" }))).is_err());
}

#[test]
fn pulse_property_and_phase() {
    let fx = parse_effect(&inst(json!({
        "type": "pulse", "property": "alpha", "amp": 0.2,
        "periodMs": 2000.0, "phaseDeg": 90.0
    })))
    .unwrap();
    let EffectKind::Pulse {
        property,
        amp,
        period_ms,
        phase_rad,
    } = fx
    else {
        panic!("expected pulse");
    };
    assert_eq!(property, PulseProperty::Alpha);
    assert_eq!(amp, 0.2);
    assert_eq!(period_ms, 2000.0);
    assert!((phase_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

    assert!(parse_effect(&inst(json!({ "type": "pulse", "property": "spin" }))).is_err());
}

#[test]
fn tilt_modes() {
    let fx = parse_effect(&inst(json!({ "type": "tilt", "mode": "pointer" }))).unwrap();
    assert!(matches!(
        fx,
        EffectKind::Tilt {
            mode: TiltMode::Pointer,
            ..
        }
    ));
    let fx = parse_effect(&inst(json!({ "type": "tilt" }))).unwrap();
    assert!(matches!(
        fx,
        EffectKind::Tilt {
            mode: TiltMode::Time,
            ..
        }
    ));
    assert!(parse_effect(&inst(json!({ "type": "tilt", "mode": "gyro" }))).is_err());
}

#[test]
fn advanced_classification() {
    for (ty, advanced) in [
        ("fade", false),
        ("pulse", false),
        ("tilt", false),
        ("glow", true),
        ("bloom", true),
        ("distort", true),
        ("shockwave", true),
    ] {
        let fx = parse_effect(&inst(json!({ "type": ty }))).unwrap();
        assert_eq!(fx.is_advanced(), advanced, "type {ty}");
    }
}

#[test]
fn unknown_and_malformed_entries_are_errors() {
    assert!(parse_effect(&inst(json!({ "type": "sparkle" }))).is_err());
    assert!(parse_effect(&inst(json!({ "type": "  " }))).is_err());
    assert!(parse_effect(&inst(json!({ "type": "fade", "from": "dark" }))).is_err());
}

#[test]
fn pingpong_fold_rises_then_falls() {
    assert_eq!(fold_pingpong(0.0), 0.0);
    assert!((fold_pingpong(0.25) - 0.5).abs() < 1e-12);
    assert_eq!(fold_pingpong(0.5), 1.0);
    assert!((fold_pingpong(0.75) - 0.5).abs() < 1e-12);
    assert!(fold_pingpong(1.0).abs() < 1e-12);
}

#[test]
fn sine_in_out_hits_endpoints_and_midpoint() {
    assert_eq!(Easing::SineInOut.apply(0.0), 0.0);
    assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Easing::SineInOut.apply(1.0) - 1.0).abs() < 1e-12);
    // Clamped outside the unit interval.
    assert_eq!(Easing::Linear.apply(1.5), 1.0);
}
