use super::*;
use crate::{
    config::model::LogicConfig,
    scene::{builder::build_scene, cache::AssetCache, memory::MemoryBackend},
};
use serde_json::json;
use std::f64::consts::{FRAC_PI_2, PI};

fn scene(layers: serde_json::Value) -> Vec<BuiltLayer> {
    let cfg: LogicConfig = serde_json::from_value(json!({ "layers": layers })).unwrap();
    let mut backend = MemoryBackend::new();
    let mut cache = AssetCache::new();
    build_scene(&cfg, &mut backend, &mut cache).unwrap().layers
}

fn no_spin(_: usize) -> Option<(f64, f64)> {
    None
}

#[test]
fn ray_projection_hits_the_near_border() {
    let rect = Rect::new(0.0, 0.0, LOGICAL_SIZE, LOGICAL_SIZE);

    // Center inside: the exit point along the ray direction.
    let hit = project_ray_to_border(
        Point::new(1024.0, 1024.0),
        Point::new(2000.0, 1024.0),
        rect,
    )
    .unwrap();
    assert!((hit.x - 2048.0).abs() < 1e-9 && (hit.y - 1024.0).abs() < 1e-9);

    // Center outside, pointing at the canvas: the entry point.
    let hit = project_ray_to_border(Point::new(-100.0, 1024.0), Point::new(100.0, 1024.0), rect)
        .unwrap();
    assert!(hit.x.abs() < 1e-9 && (hit.y - 1024.0).abs() < 1e-9);

    // Pointing away from the canvas, or a degenerate ray.
    assert!(
        project_ray_to_border(Point::new(3000.0, 1024.0), Point::new(4000.0, 1024.0), rect)
            .is_none()
    );
    assert!(
        project_ray_to_border(Point::new(100.0, 100.0), Point::new(100.0, 100.0), rect).is_none()
    );
}

#[test]
fn geometry_projects_radius_onto_the_canvas_border() {
    let center = PositionPct {
        x_pct: 50.0,
        y_pct: 50.0,
    };
    let position = PositionPct {
        x_pct: 100.0,
        y_pct: 50.0,
    };
    let (c, radius, phase) = derive_orbit_geometry(center, position).unwrap();
    assert_eq!((c.x, c.y), (1024.0, 1024.0));
    assert!((radius - 1024.0).abs() < 1e-9);
    assert!(phase.abs() < 1e-12);

    // Coincident center and position are degenerate.
    assert!(derive_orbit_geometry(center, center).is_none());
}

#[test]
fn quarter_turn_at_fifteen_rpm() {
    let mut layers = scene(json!([{
        "id": "moon", "imageRef": { "kind": "url", "url": "m.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 }, "orbitRPM": 15.0
    }]));
    let mut orbit = OrbitManager::init(&layers, no_spin);
    assert!(orbit.has_work());

    orbit.tick(1.0, &mut layers).unwrap();
    let pos = layers[0].sprite.position();
    assert!((pos.x - 1024.0).abs() < 1e-6);
    assert!((pos.y - 2048.0).abs() < 1e-6);
}

#[test]
fn ccw_orbit_runs_the_other_way() {
    let mut layers = scene(json!([{
        "id": "moon", "imageRef": { "kind": "url", "url": "m.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 },
        "orbitRPM": 15.0, "orbitDir": "ccw"
    }]));
    let mut orbit = OrbitManager::init(&layers, no_spin);

    orbit.tick(1.0, &mut layers).unwrap();
    let pos = layers[0].sprite.position();
    assert!((pos.x - 1024.0).abs() < 1e-6);
    assert!(pos.y.abs() < 1e-6);
}

#[test]
fn explicit_phase_overrides_the_border_phase() {
    let mut layers = scene(json!([{
        "id": "moon", "imageRef": { "kind": "url", "url": "m.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 },
        "orbitRPM": 15.0, "orbitPhaseDeg": 90.0
    }]));
    let mut orbit = OrbitManager::init(&layers, no_spin);

    orbit.tick(0.0, &mut layers).unwrap();
    let pos = layers[0].sprite.position();
    assert!((pos.x - 1024.0).abs() < 1e-6);
    assert!((pos.y - 2048.0).abs() < 1e-6);
}

#[test]
fn auto_orient_faces_the_path_only_without_spin() {
    let mut layers = scene(json!([{
        "id": "moon", "imageRef": { "kind": "url", "url": "m.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 },
        "orbitRPM": 15.0, "orbitOrientPolicy": "auto"
    }]));

    let mut orbit = OrbitManager::init(&layers, no_spin);
    orbit.tick(1.0, &mut layers).unwrap();
    assert!((layers[0].sprite.rotation() - FRAC_PI_2).abs() < 1e-12);

    // A spinning layer keeps whatever angle the spin pass produced.
    layers[0].sprite.set_rotation(0.25);
    let mut orbit = OrbitManager::init(&layers, |_| Some((10.0, 1.0)));
    orbit.tick(1.0, &mut layers).unwrap();
    assert_eq!(layers[0].sprite.rotation(), 0.25);
}

#[test]
fn override_orient_layers_spin_on_top_of_path_facing() {
    let mut layers = scene(json!([{
        "id": "moon", "imageRef": { "kind": "url", "url": "m.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 },
        "orbitRPM": 15.0, "orbitOrientPolicy": "override", "orbitOrientDeg": 180.0
    }]));
    let mut orbit = OrbitManager::init(&layers, |_| Some((30.0, -1.0)));

    orbit.tick(1.0, &mut layers).unwrap();
    let expected = FRAC_PI_2 + PI + (-1.0) * PI * 1.0;
    assert!((layers[0].sprite.rotation() - expected).abs() < 1e-12);
}

#[test]
fn clock_driven_orbiters_are_left_to_the_clock_manager() {
    let layers = scene(json!([{
        "id": "hand", "imageRef": { "kind": "url", "url": "h.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 }, "orbitRPM": 5.0,
        "clock": { "enabled": true, "orbitHand": "second" }
    }]));
    let orbit = OrbitManager::init(&layers, no_spin);
    assert!(!orbit.has_work());
}

#[test]
fn recompute_resumes_from_the_current_position() {
    let mut layers = scene(json!([{
        "id": "moon", "imageRef": { "kind": "url", "url": "m.png" },
        "position": { "xPct": 100.0, "yPct": 50.0 }, "orbitRPM": 7.0
    }]));
    let mut orbit = OrbitManager::init(&layers, no_spin);

    orbit.tick(1.3, &mut layers).unwrap();
    let before = layers[0].sprite.position();

    orbit.recompute(1.3, &mut layers).unwrap();
    orbit.tick(1.3, &mut layers).unwrap();
    let after = layers[0].sprite.position();

    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}
