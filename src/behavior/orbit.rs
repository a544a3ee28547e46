//! Constant-rate circular motion around a configured center.

use kurbo::{Point, Rect};

use crate::{
    config::model::{OrbitOrientPolicy, PositionPct, SpinDir},
    foundation::{error::OrreryResult, math},
    scene::builder::BuiltLayer,
    stage::coords::LOGICAL_SIZE,
};

const DEGENERATE_EPS: f64 = 1e-9;

/// Earliest positive intersection of the ray `center -> through` with the
/// border of `rect`.
///
/// Returns `None` for degenerate rays (coincident points) and for rays that
/// never reach the border in the positive direction.
pub(crate) fn project_ray_to_border(center: Point, through: Point, rect: Rect) -> Option<Point> {
    let d = through - center;
    if d.hypot() < DEGENERATE_EPS {
        return None;
    }

    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;

    for (origin, dir, lo, hi) in [
        (center.x, d.x, rect.x0, rect.x1),
        (center.y, d.y, rect.y0, rect.y1),
    ] {
        if dir.abs() < DEGENERATE_EPS {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - origin) / dir;
        let t2 = (hi - origin) / dir;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_enter > t_exit || t_exit < DEGENERATE_EPS {
        return None;
    }
    let t = if t_enter > DEGENERATE_EPS { t_enter } else { t_exit };
    Some(center + d * t)
}

/// Orbit geometry shared with the clock manager's orbit-hand drive.
///
/// The radius is the distance from the center to the layer's base position
/// projected onto the logical-canvas border along the ray from the center
/// through the configured position; the start phase is the polar angle of
/// that same border point. Returns `None` for degenerate geometry.
pub(crate) fn derive_orbit_geometry(
    center_pct: PositionPct,
    position_pct: PositionPct,
) -> Option<(Point, f64, f64)> {
    let center = Point::new(
        math::pct_to_units(center_pct.x_pct, LOGICAL_SIZE),
        math::pct_to_units(center_pct.y_pct, LOGICAL_SIZE),
    );
    let through = Point::new(
        math::pct_to_units(position_pct.x_pct, LOGICAL_SIZE),
        math::pct_to_units(position_pct.y_pct, LOGICAL_SIZE),
    );
    let rect = Rect::new(0.0, 0.0, LOGICAL_SIZE, LOGICAL_SIZE);

    let border = project_ray_to_border(center, through, rect)?;
    let radius = (border - center).hypot();
    if radius < DEGENERATE_EPS {
        return None;
    }
    let phase = (border.y - center.y).atan2(border.x - center.x);
    Some((center, radius, phase))
}

struct OrbitItem {
    layer: usize,
    center: Point,
    radius: f64,
    base_phase: f64,
    rad_per_sec: f64,
    dir: f64,
    orient: OrbitOrientPolicy,
    orient_offset: f64,
    // Nominal spin at init time; the auto-orient gate is deliberately static
    // even if spin is later reconfigured.
    spin_rate: f64,
    spin_dir: f64,
}

/// Drives layers with a positive orbit RPM along a circle, with optional
/// path-facing orientation.
#[derive(Default)]
pub struct OrbitManager {
    items: Vec<OrbitItem>,
}

impl OrbitManager {
    /// Capture per-layer orbit parameters from the built scene.
    ///
    /// Layers whose orbit position is clock-driven are excluded (the clock
    /// manager owns them). `nominal_spin` comes from the spin manager so
    /// spinning orbiters keep their spin layered on top of orbit placement.
    pub fn init(
        layers: &[BuiltLayer],
        nominal_spin: impl Fn(usize) -> Option<(f64, f64)>,
    ) -> Self {
        let mut items = Vec::new();

        for (idx, layer) in layers.iter().enumerate() {
            let cfg = &layer.cfg;
            let rpm = math::clamp_rpm_60(cfg.orbit_rpm.unwrap_or(0.0));
            if rpm <= 0.0 || cfg.clock_drives_orbit() {
                continue;
            }

            let center_pct = cfg.orbit_center.unwrap_or_else(PositionPct::center);
            let Some((center, radius, border_phase)) =
                derive_orbit_geometry(center_pct, cfg.position)
            else {
                tracing::warn!(layer = %cfg.id, "degenerate orbit geometry, layer skipped");
                continue;
            };

            let base_phase = match cfg.orbit_phase_deg {
                Some(deg) if deg.is_finite() => math::deg_to_rad(deg),
                _ => border_phase,
            };
            let (spin_rpm, spin_dir) = nominal_spin(idx).unwrap_or((0.0, 1.0));

            items.push(OrbitItem {
                layer: idx,
                center,
                radius,
                base_phase,
                rad_per_sec: math::rpm_to_rad_per_sec(rpm),
                dir: cfg.orbit_dir.unwrap_or(SpinDir::Cw).signum(),
                orient: cfg.orbit_orient_policy.unwrap_or_default(),
                orient_offset: math::deg_to_rad(cfg.orbit_orient_deg.unwrap_or(0.0)),
                spin_rate: math::rpm_to_rad_per_sec(spin_rpm),
                spin_dir,
            });
        }

        Self { items }
    }

    /// Whether any layer is actively orbit-managed.
    pub fn has_work(&self) -> bool {
        !self.items.is_empty()
    }

    /// Place each orbiter for the elapsed time and apply orientation rules.
    pub fn tick(&mut self, elapsed_secs: f64, layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        for item in &self.items {
            let Some(layer) = layers.get_mut(item.layer) else {
                continue;
            };
            let angle = item.base_phase + item.dir * item.rad_per_sec * elapsed_secs;
            layer.sprite.set_position(
                item.center.x + item.radius * angle.cos(),
                item.center.y + item.radius * angle.sin(),
            );

            match item.orient {
                OrbitOrientPolicy::Override => {
                    let mut rot = angle + item.orient_offset;
                    if item.spin_rate > 0.0 {
                        // Spin delta layered on top of the path orientation.
                        rot += item.spin_dir * item.spin_rate * elapsed_secs;
                    }
                    layer.sprite.set_rotation(rot);
                }
                OrbitOrientPolicy::Auto => {
                    // Auto-facing only applies when nothing else drives
                    // rotation; spinning layers keep the spin manager's angle.
                    if item.spin_rate <= 0.0 {
                        layer.sprite.set_rotation(angle + item.orient_offset);
                    }
                }
                OrbitOrientPolicy::None => {}
            }
        }
        Ok(())
    }

    /// Re-derive each item's base phase from the sprite's current polar
    /// angle minus the motion accumulated so far, so the next tick resumes
    /// smoothly from the current visual position.
    pub fn recompute(&mut self, elapsed_secs: f64, layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        for item in &mut self.items {
            let Some(layer) = layers.get(item.layer) else {
                continue;
            };
            let pos = layer.sprite.position();
            let current = (pos.y - item.center.y).atan2(pos.x - item.center.x);
            item.base_phase = current - item.dir * item.rad_per_sec * elapsed_secs;
        }
        Ok(())
    }

    /// Drop all captured items. Idempotent.
    pub fn dispose(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/orbit.rs"]
mod tests;
