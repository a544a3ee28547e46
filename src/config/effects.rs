//! Typed effect definitions parsed from raw config entries.
//!
//! Effects arrive as loosely-typed JSON fragments ([`EffectInstance`]); this
//! module turns them into exhaustive tagged variants before anything reaches
//! the tick loop. Core effects (`fade`, `pulse`, `tilt`) are always active;
//! advanced effects (`glow`, `bloom`, `distort`, `shockwave`) are gated by a
//! capability policy at manager init.

use std::f64::consts::PI;

use crate::{
    config::model::EffectInstance,
    foundation::error::{OrreryError, OrreryResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Easing curves supported by the fade effect.
pub enum Easing {
    /// Straight-line interpolation.
    #[default]
    Linear,
    /// Sinusoidal ease-in-out.
    SineInOut,
}

impl Easing {
    /// Apply the curve to a normalized progress value.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SineInOut => -(f64::cos(PI * t) - 1.0) / 2.0,
        }
    }
}

/// Fold a normalized phase for ping-pong looping: rise over the first half
/// of the period, fall over the second.
pub fn fold_pingpong(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t > 0.5 { 1.0 - (t - 0.5) * 2.0 } else { t * 2.0 }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Which sprite property a pulse modulates.
pub enum PulseProperty {
    /// Multiplicative scale oscillation.
    #[default]
    Scale,
    /// Multiplicative opacity oscillation.
    Alpha,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What drives the tilt offset.
pub enum TiltMode {
    /// Sine wave over elapsed time.
    #[default]
    Time,
    /// Normalized pointer position.
    Pointer,
    /// Device orientation; reserved, currently produces no offset.
    Device,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Fully typed effect variants.
pub enum EffectKind {
    /// Opacity ramp between two values, looping ping-pong or one-shot.
    Fade {
        /// Start opacity factor.
        from: f64,
        /// End opacity factor.
        to: f64,
        /// Ramp duration in milliseconds.
        duration_ms: f64,
        /// Loop ping-pong when `true`, clamp at `to` otherwise.
        looped: bool,
        /// Easing curve applied to the ramp.
        easing: Easing,
    },
    /// Multiplicative oscillation on scale or alpha.
    Pulse {
        /// Modulated property.
        property: PulseProperty,
        /// Oscillation amplitude (`1 + amp * sin(...)`).
        amp: f64,
        /// Oscillation period in milliseconds.
        period_ms: f64,
        /// Phase offset in radians.
        phase_rad: f64,
    },
    /// Small rotational offset applied as a tracked delta.
    Tilt {
        /// Offset driver.
        mode: TiltMode,
        /// Maximum offset in degrees.
        max_deg: f64,
        /// Wave period in milliseconds (time mode).
        period_ms: f64,
    },
    /// Soft aura sprite behind the layer.
    Glow {
        /// Aura scale relative to the layer's base scale.
        scale_mult: f64,
        /// Aura opacity.
        alpha: f64,
        /// Aura breathing period in milliseconds.
        period_ms: f64,
    },
    /// Larger, fainter aura sprite behind the layer.
    Bloom {
        /// Aura scale relative to the layer's base scale.
        scale_mult: f64,
        /// Aura opacity.
        alpha: f64,
        /// Aura breathing period in milliseconds.
        period_ms: f64,
    },
    /// Small positional jitter on the host sprite.
    Distort {
        /// Jitter amplitude in logical pixels.
        amp_px: f64,
        /// Jitter frequency in Hz.
        freq_hz: f64,
    },
    /// Periodic scale/alpha pulse that overrides basic effects for its tick.
    Shockwave {
        /// Pulse period in milliseconds.
        period_ms: f64,
        /// Peak additional scale (0.25 = up to 125%).
        scale_amp: f64,
        /// Peak opacity dip (0.35 = down to 65%).
        alpha_dip: f64,
    },
}

impl EffectKind {
    /// Whether the effect belongs to the capability-gated advanced bucket.
    pub fn is_advanced(&self) -> bool {
        matches!(
            self,
            Self::Glow { .. } | Self::Bloom { .. } | Self::Distort { .. } | Self::Shockwave { .. }
        )
    }
}

/// Parse a raw effect entry into a typed [`EffectKind`].
///
/// Unknown kinds and malformed parameters are errors; callers downgrade them
/// to a warning and drop the entry.
pub fn parse_effect(inst: &EffectInstance) -> OrreryResult<EffectKind> {
    let kind = inst.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(OrreryError::config("effect type must be non-empty"));
    }

    match kind.as_str() {
        "fade" => {
            let from = get_f64_or(&inst.params, "from", 0.0)?;
            let to = get_f64_or(&inst.params, "to", 1.0)?;
            let duration_ms = get_f64_or(&inst.params, "durationMs", 1000.0)?;
            if duration_ms <= 0.0 {
                return Err(OrreryError::config("fade.durationMs must be > 0"));
            }
            let looped = get_bool_or(&inst.params, "loop", true)?;
            let easing = match inst.params.get("easing").and_then(|v| v.as_str()) {
                None | Some("linear") => Easing::Linear,
                Some("sine-in-out") | Some("sineInOut") => Easing::SineInOut,
                Some(other) => {
                    return Err(OrreryError::config(format!(
                        "unknown fade.easing '{other}'"
                    )));
                }
            };
            Ok(EffectKind::Fade {
                from: from.clamp(0.0, 1.0),
                to: to.clamp(0.0, 1.0),
                duration_ms,
                looped,
                easing,
            })
        }
        "pulse" => {
            let property = match inst.params.get("property").and_then(|v| v.as_str()) {
                None | Some("scale") => PulseProperty::Scale,
                Some("alpha") => PulseProperty::Alpha,
                Some(other) => {
                    return Err(OrreryError::config(format!(
                        "unknown pulse.property '{other}'"
                    )));
                }
            };
            let amp = get_f64_or(&inst.params, "amp", 0.1)?;
            let period_ms = get_f64_or(&inst.params, "periodMs", 1000.0)?;
            if period_ms <= 0.0 {
                return Err(OrreryError::config("pulse.periodMs must be > 0"));
            }
            let phase_deg = get_f64_or(&inst.params, "phaseDeg", 0.0)?;
            Ok(EffectKind::Pulse {
                property,
                amp,
                period_ms,
                phase_rad: crate::foundation::math::deg_to_rad(phase_deg),
            })
        }
        "tilt" => {
            let mode = match inst.params.get("mode").and_then(|v| v.as_str()) {
                None | Some("time") => TiltMode::Time,
                Some("pointer") => TiltMode::Pointer,
                Some("device") => TiltMode::Device,
                Some(other) => {
                    return Err(OrreryError::config(format!("unknown tilt.mode '{other}'")));
                }
            };
            let max_deg = get_f64_or(&inst.params, "maxDeg", 6.0)?;
            let period_ms = get_f64_or(&inst.params, "periodMs", 4000.0)?;
            if period_ms <= 0.0 {
                return Err(OrreryError::config("tilt.periodMs must be > 0"));
            }
            Ok(EffectKind::Tilt {
                mode,
                max_deg,
                period_ms,
            })
        }
        "glow" => Ok(EffectKind::Glow {
            scale_mult: get_f64_or(&inst.params, "scaleMult", 1.3)?,
            alpha: get_f64_or(&inst.params, "alpha", 0.5)?.clamp(0.0, 1.0),
            period_ms: positive_or(&inst.params, "periodMs", 1200.0, "glow.periodMs")?,
        }),
        "bloom" => Ok(EffectKind::Bloom {
            scale_mult: get_f64_or(&inst.params, "scaleMult", 1.6)?,
            alpha: get_f64_or(&inst.params, "alpha", 0.35)?.clamp(0.0, 1.0),
            period_ms: positive_or(&inst.params, "periodMs", 1800.0, "bloom.periodMs")?,
        }),
        "distort" => Ok(EffectKind::Distort {
            amp_px: get_f64_or(&inst.params, "ampPx", 3.0)?,
            freq_hz: positive_or(&inst.params, "freqHz", 7.0, "distort.freqHz")?,
        }),
        "shockwave" => Ok(EffectKind::Shockwave {
            period_ms: positive_or(&inst.params, "periodMs", 2000.0, "shockwave.periodMs")?,
            scale_amp: get_f64_or(&inst.params, "scaleAmp", 0.25)?,
            alpha_dip: get_f64_or(&inst.params, "alphaDip", 0.35)?.clamp(0.0, 1.0),
        }),
        _ => Err(OrreryError::config(format!("unknown effect type '{kind}'"))),
    }
}

fn get_f64_or(params: &serde_json::Value, key: &str, default: f64) -> OrreryResult<f64> {
    let Some(v) = params.get(key) else {
        return Ok(default);
    };
    let Some(n) = v.as_f64() else {
        return Err(OrreryError::config(format!(
            "effect param '{key}' must be a number"
        )));
    };
    if !n.is_finite() {
        return Err(OrreryError::config(format!(
            "effect param '{key}' must be finite"
        )));
    }
    Ok(n)
}

fn get_bool_or(params: &serde_json::Value, key: &str, default: bool) -> OrreryResult<bool> {
    let Some(v) = params.get(key) else {
        return Ok(default);
    };
    v.as_bool().ok_or_else(|| {
        OrreryError::config(format!("effect param '{key}' must be a boolean"))
    })
}

fn positive_or(
    params: &serde_json::Value,
    key: &str,
    default: f64,
    field: &str,
) -> OrreryResult<f64> {
    let v = get_f64_or(params, key, default)?;
    if v <= 0.0 {
        return Err(OrreryError::config(format!("{field} must be > 0")));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/config/effects.rs"]
mod tests;
