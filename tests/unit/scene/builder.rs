use super::*;
use crate::scene::{cache::AssetCache, memory::MemoryBackend};
use serde_json::json;
use std::f64::consts::FRAC_PI_2;

fn config(layers: serde_json::Value) -> LogicConfig {
    serde_json::from_value(json!({
        "imageRegistry": {
            "gear": "assets/gear.png",
            "hand": "assets/hand.png"
        },
        "layers": layers
    }))
    .unwrap()
}

#[test]
fn layers_are_built_in_z_then_id_order() {
    let cfg = config(json!([
        { "id": "layer10", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 10.0, "yPct": 10.0 } },
        { "id": "background", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 50.0, "yPct": 50.0 } },
        { "id": "layer2", "imageRef": { "kind": "urlId", "id": "hand" },
          "position": { "xPct": 20.0, "yPct": 20.0 } }
    ]));
    let mut backend = MemoryBackend::new();
    let mut cache = AssetCache::new();
    let scene = build_scene(&cfg, &mut backend, &mut cache).unwrap();

    let ids: Vec<&str> = scene.layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["background", "layer2", "layer10"]);

    let zs: Vec<i32> = scene.layers.iter().map(|l| l.sprite.z_index()).collect();
    assert_eq!(zs, [0, 2, 10]);
    assert!(scene.layers.iter().all(|l| l.sprite.visible()));
}

#[test]
fn unresolved_and_failing_layers_are_skipped() {
    let cfg = config(json!([
        { "id": "ok", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 50.0, "yPct": 50.0 } },
        { "id": "missing", "imageRef": { "kind": "urlId", "id": "ghost" },
          "position": { "xPct": 50.0, "yPct": 50.0 } },
        { "id": "broken", "imageRef": { "kind": "url", "url": "assets/broken.png" },
          "position": { "xPct": 50.0, "yPct": 50.0 } }
    ]));
    let mut backend = MemoryBackend::new().fail_url("assets/broken.png");
    let mut cache = AssetCache::new();
    let scene = build_scene(&cfg, &mut backend, &mut cache).unwrap();

    let ids: Vec<&str> = scene.layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["ok"]);
}

#[test]
fn preload_set_is_deduplicated() {
    let cfg = config(json!([
        { "id": "a", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 50.0, "yPct": 50.0 } },
        { "id": "b", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 60.0, "yPct": 60.0 } }
    ]));
    let mut backend = MemoryBackend::new();
    let probe = backend.probe();
    let mut cache = AssetCache::new();
    build_scene(&cfg, &mut backend, &mut cache).unwrap();

    assert_eq!(probe.preloaded(), vec!["assets/gear.png".to_string()]);
}

#[test]
fn static_transform_maps_percentages_onto_logical_canvas() {
    let cfg = config(json!([
        { "id": "layer5", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 50.0, "yPct": 25.0 },
          "scale": { "pct": 50.0 }, "angleDeg": 90.0 }
    ]));
    let mut backend = MemoryBackend::new();
    let mut cache = AssetCache::new();
    let scene = build_scene(&cfg, &mut backend, &mut cache).unwrap();

    let sprite = &scene.layers[0].sprite;
    let pos = sprite.position();
    assert_eq!((pos.x, pos.y), (1024.0, 512.0));
    assert_eq!(sprite.scale().x, 0.5);
    assert!((sprite.rotation() - FRAC_PI_2).abs() < 1e-12);
    assert_eq!(sprite.alpha(), 1.0);
}

#[test]
fn invalid_config_is_a_hard_error() {
    let cfg = config(json!([
        { "id": "dup", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 50.0, "yPct": 50.0 } },
        { "id": "dup", "imageRef": { "kind": "urlId", "id": "gear" },
          "position": { "xPct": 50.0, "yPct": 50.0 } }
    ]));
    let mut backend = MemoryBackend::new();
    let mut cache = AssetCache::new();
    assert!(build_scene(&cfg, &mut backend, &mut cache).is_err());
}
