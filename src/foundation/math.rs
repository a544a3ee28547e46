//! Angle, rate and percentage helpers shared by the behavior managers.
//!
//! Everything here is a pure function over `f64`; non-finite inputs are
//! normalized to safe values rather than propagated into the tick loop.

use std::f64::consts::PI;

/// Maximum accepted rotations-per-minute for spin and orbit rates.
pub const MAX_RPM: f64 = 60.0;

/// Convert degrees to radians.
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees.
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Clamp an RPM value to `[0, 60]`. Non-finite or negative input yields 0.
pub fn clamp_rpm_60(rpm: f64) -> f64 {
    if !rpm.is_finite() || rpm <= 0.0 {
        return 0.0;
    }
    rpm.min(MAX_RPM)
}

/// Convert rotations-per-minute to radians-per-second (`rpm * PI / 30`).
pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * PI / 30.0
}

/// Normalize an angle into `[0, 2*PI)`.
pub fn normalize_angle_rad(a: f64) -> f64 {
    let tau = 2.0 * PI;
    let r = a % tau;
    if r < 0.0 { r + tau } else { r }
}

/// Map a percentage (`0..=100`) of `extent` to absolute units.
///
/// Values outside the range are allowed (layers may be placed off-canvas);
/// non-finite input yields 0.
pub fn pct_to_units(pct: f64, extent: f64) -> f64 {
    if !pct.is_finite() {
        return 0.0;
    }
    pct / 100.0 * extent
}

/// Seeded FNV-1a 64 over a string. Used to derive stable per-layer phases
/// for procedural jitter.
pub(crate) fn stable_hash64(seed: u64, s: &str) -> u64 {
    let mut h = 0xcbf2_9ce4_8422_2325u64 ^ seed;
    for &b in s.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
    }
    h
}
