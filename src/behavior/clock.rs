//! Real-time-clock-driven rotation and orbit, mimicking analog clock hands.
//!
//! Unlike the other managers, `tick` ignores the engine's elapsed time and
//! re-samples the wall clock on every frame, so hands stay correct across
//! paused or throttled frame loops and accumulate no tick-rate drift.

use std::f64::consts::{FRAC_PI_2, TAU};

use chrono::Timelike;
use kurbo::{Point, Vec2};

use crate::{
    behavior::orbit::derive_orbit_geometry,
    config::model::{ClockFormat, ClockHand, OrbitOrientPolicy, PositionPct, TimeZoneSpec},
    foundation::{error::OrreryResult, math},
    scene::builder::BuiltLayer,
};

const DEGENERATE_EPS: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A sampled wall-clock instant reduced to dial fields.
pub struct WallTime {
    /// Hour `0..24`.
    pub hour: u32,
    /// Minute `0..60`.
    pub minute: u32,
    /// Second `0..60`.
    pub second: u32,
    /// Millisecond `0..1000`.
    pub millis: u32,
}

/// Sample the configured wall-clock source.
pub fn sample_wall_time(timezone: TimeZoneSpec, tz_offset_minutes: i32) -> WallTime {
    fn fields(t: impl Timelike) -> WallTime {
        WallTime {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
            millis: t.nanosecond() / 1_000_000,
        }
    }

    match timezone {
        TimeZoneSpec::Device => fields(chrono::Local::now()),
        TimeZoneSpec::Utc => fields(chrono::Utc::now()),
        TimeZoneSpec::Server => fields(
            chrono::Utc::now() + chrono::Duration::minutes(i64::from(tz_offset_minutes)),
        ),
    }
}

/// Angle of a clock hand in radians (0 at 12 o'clock, clockwise positive).
///
/// With `smooth`, the next-smaller unit's fraction is carried in: millis
/// into seconds, seconds into minutes, minutes and seconds into hours.
/// `ClockHand::None` yields 0.
pub fn hand_angle(hand: ClockHand, format: ClockFormat, smooth: bool, t: &WallTime) -> f64 {
    match hand {
        ClockHand::None => 0.0,
        ClockHand::Second => {
            let s = f64::from(t.second)
                + if smooth { f64::from(t.millis) / 1000.0 } else { 0.0 };
            TAU * s / 60.0
        }
        ClockHand::Minute => {
            let m = f64::from(t.minute)
                + if smooth { f64::from(t.second) / 60.0 } else { 0.0 };
            TAU * m / 60.0
        }
        ClockHand::Hour => {
            let carry = if smooth {
                f64::from(t.minute) / 60.0 + f64::from(t.second) / 3600.0
            } else {
                0.0
            };
            match format {
                ClockFormat::H12 => TAU * (f64::from(t.hour % 12) + carry) / 12.0,
                ClockFormat::H24 => TAU * (f64::from(t.hour) + carry) / 24.0,
            }
        }
    }
}

/// Project a clock-style angle (0 = up, clockwise positive) onto the border
/// of a box with the given half extents, centered at the origin.
fn project_angle_to_box(angle_deg: f64, half_w: f64, half_h: f64) -> Option<Point> {
    if half_w < DEGENERATE_EPS || half_h < DEGENERATE_EPS {
        return None;
    }
    let a = math::deg_to_rad(angle_deg);
    let dir = Vec2::new(a.sin(), -a.cos());
    let tx = if dir.x.abs() < DEGENERATE_EPS { f64::INFINITY } else { half_w / dir.x.abs() };
    let ty = if dir.y.abs() < DEGENERATE_EPS { f64::INFINITY } else { half_h / dir.y.abs() };
    let t = tx.min(ty);
    if !t.is_finite() {
        return None;
    }
    Some(Point::new(dir.x * t, dir.y * t))
}

struct ClockItem {
    layer: usize,
    static_base: f64,
    /// Angle of the sprite's base->tip vector relative to "up"; subtracted
    /// so the tip, not the sprite's default axis, points at the dial angle.
    tip_offset: f64,
    spin_hand: ClockHand,
    orbit_hand: ClockHand,
    smooth: bool,
    format: ClockFormat,
    timezone: TimeZoneSpec,
    tz_offset_minutes: i32,
    orbit: Option<(Point, f64)>, // center px, radius
    orient: OrbitOrientPolicy,
    orient_offset: f64,
    has_spin: bool,
}

/// Drives clock-enabled layers from sampled wall-clock time.
#[derive(Default)]
pub struct ClockManager {
    items: Vec<ClockItem>,
}

impl ClockManager {
    /// Capture per-layer clock parameters from the built scene.
    ///
    /// Layers with unresolvable sprite dimensions or degenerate base/tip
    /// geometry are skipped with a warning.
    pub fn init(
        layers: &[BuiltLayer],
        nominal_spin: impl Fn(usize) -> Option<(f64, f64)>,
    ) -> Self {
        let mut items = Vec::new();

        for (idx, layer) in layers.iter().enumerate() {
            let Some(clock) = layer.cfg.clock.as_ref().filter(|c| c.enabled) else {
                continue;
            };

            let Some((w, h)) = layer.sprite.size() else {
                tracing::warn!(layer = %layer.cfg.id, "sprite has no resolvable size, clock layer skipped");
                continue;
            };
            let base_deg = clock.base.map(|p| p.angle_deg).unwrap_or(180.0);
            let tip_deg = clock.tip.map(|p| p.angle_deg).unwrap_or(0.0);
            let (Some(base_pt), Some(tip_pt)) = (
                project_angle_to_box(base_deg, w / 2.0, h / 2.0),
                project_angle_to_box(tip_deg, w / 2.0, h / 2.0),
            ) else {
                tracing::warn!(layer = %layer.cfg.id, "degenerate sprite box, clock layer skipped");
                continue;
            };
            let hand_vec = tip_pt - base_pt;
            if hand_vec.hypot() < DEGENERATE_EPS {
                tracing::warn!(layer = %layer.cfg.id, "base and tip coincide, clock layer skipped");
                continue;
            }
            let tip_offset = hand_vec.y.atan2(hand_vec.x) + FRAC_PI_2;

            let orbit = if clock.orbit_hand != ClockHand::None {
                let center_pct = clock
                    .center
                    .or(layer.cfg.orbit_center)
                    .unwrap_or_else(PositionPct::center);
                match derive_orbit_geometry(center_pct, layer.cfg.position) {
                    Some((center, radius, _)) => Some((center, radius)),
                    None => {
                        tracing::warn!(layer = %layer.cfg.id, "degenerate clock orbit geometry, orbit hand disabled");
                        None
                    }
                }
            } else {
                None
            };

            items.push(ClockItem {
                layer: idx,
                static_base: layer.sprite.rotation(),
                tip_offset,
                spin_hand: clock.spin_hand,
                orbit_hand: clock.orbit_hand,
                smooth: clock.smooth,
                format: clock.format,
                timezone: clock.timezone,
                tz_offset_minutes: clock.source.tz_offset_minutes,
                orbit,
                orient: layer.cfg.orbit_orient_policy.unwrap_or_default(),
                orient_offset: math::deg_to_rad(layer.cfg.orbit_orient_deg.unwrap_or(0.0)),
                has_spin: nominal_spin(idx).is_some_and(|(rpm, _)| rpm > 0.0),
            });
        }

        Self { items }
    }

    /// Whether any layer is clock-managed.
    pub fn has_work(&self) -> bool {
        !self.items.is_empty()
    }

    /// Re-sample the wall clock and update every clock-managed layer.
    /// The engine's elapsed time is deliberately not an input.
    pub fn tick(&mut self, layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        for item in &self.items {
            let time = sample_wall_time(item.timezone, item.tz_offset_minutes);
            Self::apply_item(item, &time, layers);
        }
        Ok(())
    }

    /// Apply one explicit time sample to every item. Drives deterministic
    /// tests and external time injection.
    pub fn apply_time(&mut self, time: &WallTime, layers: &mut [BuiltLayer]) {
        for item in &self.items {
            Self::apply_item(item, time, layers);
        }
    }

    fn apply_item(item: &ClockItem, time: &WallTime, layers: &mut [BuiltLayer]) {
        let Some(layer) = layers.get_mut(item.layer) else {
            return;
        };

        if item.spin_hand != ClockHand::None {
            let angle = hand_angle(item.spin_hand, item.format, item.smooth, time);
            layer
                .sprite
                .set_rotation(item.static_base + angle - item.tip_offset);
        }

        if item.orbit_hand != ClockHand::None
            && let Some((center, radius)) = item.orbit
        {
            let angle = hand_angle(item.orbit_hand, item.format, item.smooth, time);
            // Dial angle to polar angle: 12 o'clock sits at the top.
            let polar = angle - FRAC_PI_2;
            layer
                .sprite
                .set_position(center.x + radius * polar.cos(), center.y + radius * polar.sin());

            match item.orient {
                OrbitOrientPolicy::Override => {
                    layer.sprite.set_rotation(polar + item.orient_offset);
                }
                OrbitOrientPolicy::Auto => {
                    if item.spin_hand == ClockHand::None && !item.has_spin {
                        layer.sprite.set_rotation(polar + item.orient_offset);
                    }
                }
                OrbitOrientPolicy::None => {}
            }
        }
    }

    /// Geometry was captured in percentage form at init; nothing depends on
    /// the viewport.
    pub fn recompute(&mut self, _elapsed_secs: f64, _layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        Ok(())
    }

    /// Drop all captured items. Idempotent.
    pub fn dispose(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/clock.rs"]
mod tests;
