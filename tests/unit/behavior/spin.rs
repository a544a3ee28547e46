use super::*;
use crate::{
    config::model::LogicConfig,
    scene::{builder::BuiltLayer, builder::build_scene, cache::AssetCache, memory::MemoryBackend},
};
use serde_json::json;
use std::f64::consts::PI;

fn scene(layers: serde_json::Value) -> Vec<BuiltLayer> {
    let cfg: LogicConfig = serde_json::from_value(json!({ "layers": layers })).unwrap();
    let mut backend = MemoryBackend::new();
    let mut cache = AssetCache::new();
    build_scene(&cfg, &mut backend, &mut cache).unwrap().layers
}

#[test]
fn thirty_rpm_clockwise_is_half_turn_per_second() {
    let mut layers = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": 30.0
    }]));
    let mut spin = SpinManager::init(&layers);
    assert!(spin.has_work());

    spin.tick(1.0, &mut layers).unwrap();
    assert!((layers[0].sprite.rotation() - PI).abs() < 1e-12);
}

#[test]
fn ccw_spin_subtracts_from_base_angle() {
    let mut layers = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 },
        "angleDeg": 90.0, "spinRPM": 10.0, "spinDir": "ccw"
    }]));
    let base = layers[0].sprite.rotation();
    let mut spin = SpinManager::init(&layers);

    spin.tick(2.0, &mut layers).unwrap();
    let expected = base - (10.0 * PI / 30.0) * 2.0;
    assert!((layers[0].sprite.rotation() - expected).abs() < 1e-12);
}

#[test]
fn rotation_is_replayed_from_elapsed_time_not_integrated() {
    let mut a = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": 17.0
    }]));
    let mut b = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": 17.0
    }]));
    let mut spin_a = SpinManager::init(&a);
    let mut spin_b = SpinManager::init(&b);

    // Many small steps against a single jump to the same elapsed time.
    for i in 1..=20 {
        spin_a.tick(f64::from(i) * 0.1, &mut a).unwrap();
    }
    spin_b.tick(2.0, &mut b).unwrap();
    assert!((a[0].sprite.rotation() - b[0].sprite.rotation()).abs() < 1e-12);
}

#[test]
fn out_of_range_rpm_clamps_to_sixty() {
    let mut layers = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": 120.0
    }]));
    let mut spin = SpinManager::init(&layers);
    spin.tick(1.0, &mut layers).unwrap();
    assert!((layers[0].sprite.rotation() - 2.0 * PI).abs() < 1e-12);
}

#[test]
fn negative_rpm_yields_no_work() {
    let layers = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": -5.0
    }]));
    let spin = SpinManager::init(&layers);
    assert!(!spin.has_work());
    assert_eq!(spin.nominal_spin(0), None);
}

#[test]
fn clock_enabled_layers_keep_nominal_rpm_but_are_not_rotated() {
    let mut layers = scene(json!([{
        "id": "hand", "imageRef": { "kind": "url", "url": "h.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": 20.0,
        "clock": { "enabled": true, "spinHand": "second" }
    }]));
    let before = layers[0].sprite.rotation();
    let mut spin = SpinManager::init(&layers);

    assert!(!spin.has_work());
    assert_eq!(spin.nominal_spin(0), Some((20.0, 1.0)));

    spin.tick(5.0, &mut layers).unwrap();
    assert_eq!(layers[0].sprite.rotation(), before);
}

#[test]
fn dispose_is_idempotent() {
    let layers = scene(json!([{
        "id": "gear", "imageRef": { "kind": "url", "url": "g.png" },
        "position": { "xPct": 50.0, "yPct": 50.0 }, "spinRPM": 30.0
    }]));
    let mut spin = SpinManager::init(&layers);
    spin.dispose();
    spin.dispose();
    assert!(!spin.has_work());
}
