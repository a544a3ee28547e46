//! Time-based modulation of alpha, scale and rotation, plus auxiliary aura
//! visuals.
//!
//! Basic effects (fade, pulse) compose multiplicatively onto the base
//! scale/alpha captured at init. Tilt is applied as a tracked delta so it
//! stays order-independent relative to spin, orbit and clock rotation.
//! Advanced effects (glow, bloom, distort, shockwave) only activate when the
//! capability policy passes.

use std::f64::consts::{PI, TAU};

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::{
    config::{
        effects::{EffectKind, Easing, PulseProperty, TiltMode, fold_pingpong, parse_effect},
        model::zindex_from_id,
    },
    foundation::{error::OrreryResult, math},
    scene::{backend::Sprite, backend::SpriteBackend, builder::BuiltLayer},
};

/// Decides whether the advanced effect bucket runs on this device.
///
/// Kept pluggable: the default heuristic's thresholds are inherited behavior,
/// not a hard requirement of the engine.
pub trait CapabilityPolicy {
    /// Whether glow/bloom/distort/shockwave may activate.
    fn allow_advanced(&self, hardware_accelerated: bool) -> bool;
}

#[derive(Clone, Copy, Debug)]
/// Default gate: hardware acceleration, enough cores and (when known)
/// enough memory.
pub struct HeuristicCapability {
    /// Minimum logical core count.
    pub min_cores: usize,
    /// Minimum device memory in GiB, checked only when reported.
    pub min_memory_gb: f64,
    /// Device memory as reported by the embedder, if available.
    pub reported_memory_gb: Option<f64>,
}

impl Default for HeuristicCapability {
    fn default() -> Self {
        Self {
            min_cores: 4,
            min_memory_gb: 4.0,
            reported_memory_gb: None,
        }
    }
}

impl CapabilityPolicy for HeuristicCapability {
    fn allow_advanced(&self, hardware_accelerated: bool) -> bool {
        if !hardware_accelerated {
            return false;
        }
        let cores = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(1);
        if cores < self.min_cores {
            return false;
        }
        match self.reported_memory_gb {
            Some(gb) => gb >= self.min_memory_gb,
            None => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Policy that always admits advanced effects. Useful for tests and hosts
/// that gate elsewhere.
pub struct AllowAllCapability;

impl CapabilityPolicy for AllowAllCapability {
    fn allow_advanced(&self, _hardware_accelerated: bool) -> bool {
        true
    }
}

struct FadeFx {
    from: f64,
    to: f64,
    duration_ms: f64,
    looped: bool,
    easing: Easing,
}

struct PulseFx {
    property: PulseProperty,
    amp: f64,
    period_ms: f64,
    phase_rad: f64,
}

struct TiltState {
    mode: TiltMode,
    max_rad: f64,
    period_ms: f64,
    prev_rad: f64,
}

enum AdvancedFx {
    /// Glow/bloom aura mirroring the host sprite with its own breath pulse.
    Aura {
        aura: usize,
        scale_mult: f64,
        period_ms: f64,
    },
    /// Additive positional jitter, tracked as a delta.
    Distort {
        amp_px: f64,
        freq_hz: f64,
        phase_x: f64,
        phase_y: f64,
        orbit_driven: bool,
        prev: Vec2,
    },
    /// Periodic scale/alpha pulse overriding the basic buckets for its tick.
    Shockwave {
        period_ms: f64,
        scale_amp: f64,
        alpha_dip: f64,
    },
}

struct EffectItem {
    layer: usize,
    base_scale: Vec2,
    base_alpha: f64,
    fades: SmallVec<[FadeFx; 2]>,
    pulses: SmallVec<[PulseFx; 2]>,
    tilt: Option<TiltState>,
    advanced: Vec<AdvancedFx>,
}

/// Drives per-layer fade/pulse/tilt effects and the advanced aura bucket.
#[derive(Default)]
pub struct EffectManager {
    items: Vec<EffectItem>,
    auras: Vec<Box<dyn Sprite>>,
}

impl EffectManager {
    /// Parse and bucket each layer's effect list, capture base scale/alpha,
    /// and create aura sprites through the same backend factory as primary
    /// sprites.
    ///
    /// Malformed or unknown effect entries are dropped with a warning.
    pub fn init(
        layers: &[BuiltLayer],
        backend: &mut dyn SpriteBackend,
        policy: &dyn CapabilityPolicy,
    ) -> Self {
        let advanced_allowed = policy.allow_advanced(backend.hardware_accelerated());
        let mut items = Vec::new();
        let mut auras: Vec<Box<dyn Sprite>> = Vec::new();

        for (idx, layer) in layers.iter().enumerate() {
            if layer.cfg.effects.is_empty() {
                continue;
            }

            let mut fades = SmallVec::new();
            let mut pulses = SmallVec::new();
            let mut tilt = None;
            let mut advanced = Vec::new();
            let seed = math::stable_hash64(0, &layer.cfg.id);

            for inst in &layer.cfg.effects {
                let kind = match parse_effect(inst) {
                    Ok(k) => k,
                    Err(err) => {
                        tracing::warn!(layer = %layer.cfg.id, %err, "effect entry dropped");
                        continue;
                    }
                };
                if kind.is_advanced() && !advanced_allowed {
                    tracing::debug!(layer = %layer.cfg.id, "advanced effect gated off");
                    continue;
                }
                match kind {
                    EffectKind::Fade {
                        from,
                        to,
                        duration_ms,
                        looped,
                        easing,
                    } => fades.push(FadeFx {
                        from,
                        to,
                        duration_ms,
                        looped,
                        easing,
                    }),
                    EffectKind::Pulse {
                        property,
                        amp,
                        period_ms,
                        phase_rad,
                    } => pulses.push(PulseFx {
                        property,
                        amp,
                        period_ms,
                        phase_rad,
                    }),
                    EffectKind::Tilt {
                        mode,
                        max_deg,
                        period_ms,
                    } => {
                        // A layer carries at most one tilt; the last entry wins.
                        tilt = Some(TiltState {
                            mode,
                            max_rad: math::deg_to_rad(max_deg),
                            period_ms,
                            prev_rad: 0.0,
                        });
                    }
                    EffectKind::Glow {
                        scale_mult,
                        alpha,
                        period_ms,
                    }
                    | EffectKind::Bloom {
                        scale_mult,
                        alpha,
                        period_ms,
                    } => match backend.create_sprite(&layer.url) {
                        Ok(mut sprite) => {
                            let pos = layer.sprite.position();
                            let base = layer.sprite.scale();
                            sprite.set_position(pos.x, pos.y);
                            sprite.set_rotation(layer.sprite.rotation());
                            sprite.set_scale(base.x * scale_mult, base.y * scale_mult);
                            sprite.set_alpha(alpha);
                            sprite.set_z_index(zindex_from_id(&layer.cfg.id) - 1);
                            advanced.push(AdvancedFx::Aura {
                                aura: auras.len(),
                                scale_mult,
                                period_ms,
                            });
                            auras.push(sprite);
                        }
                        Err(err) => {
                            tracing::warn!(layer = %layer.cfg.id, %err, "aura sprite creation failed");
                        }
                    },
                    EffectKind::Distort { amp_px, freq_hz } => {
                        advanced.push(AdvancedFx::Distort {
                            amp_px,
                            freq_hz,
                            phase_x: (seed & 0xffff) as f64 / 65536.0 * TAU,
                            phase_y: ((seed >> 16) & 0xffff) as f64 / 65536.0 * TAU,
                            orbit_driven: math::clamp_rpm_60(layer.cfg.orbit_rpm.unwrap_or(0.0))
                                > 0.0
                                || layer.cfg.clock_drives_orbit(),
                            prev: Vec2::ZERO,
                        });
                    }
                    EffectKind::Shockwave {
                        period_ms,
                        scale_amp,
                        alpha_dip,
                    } => advanced.push(AdvancedFx::Shockwave {
                        period_ms,
                        scale_amp,
                        alpha_dip,
                    }),
                }
            }

            if fades.is_empty() && pulses.is_empty() && tilt.is_none() && advanced.is_empty() {
                continue;
            }
            items.push(EffectItem {
                layer: idx,
                base_scale: layer.sprite.scale(),
                base_alpha: layer.sprite.alpha(),
                fades,
                pulses,
                tilt,
                advanced,
            });
        }

        Self { items, auras }
    }

    /// Whether any layer carries a parsed effect.
    pub fn has_effects(&self) -> bool {
        !self.items.is_empty()
    }

    /// Apply all effects for the elapsed time.
    ///
    /// `pointer` is the normalized pointer position in `[-1, 1]` per axis,
    /// consumed by pointer-mode tilt.
    pub fn tick(
        &mut self,
        elapsed_secs: f64,
        layers: &mut [BuiltLayer],
        pointer: Option<Point>,
    ) -> OrreryResult<()> {
        let t_ms = elapsed_secs * 1000.0;

        for item in &mut self.items {
            let Some(layer) = layers.get_mut(item.layer) else {
                continue;
            };

            // Basic bucket: multiplicative onto the captured base values.
            let mut scale_mult = 1.0;
            let mut alpha_mult = 1.0;

            for fade in &item.fades {
                let phase = if fade.looped {
                    fold_pingpong((t_ms % fade.duration_ms) / fade.duration_ms)
                } else {
                    (t_ms / fade.duration_ms).min(1.0)
                };
                alpha_mult *= fade.from + (fade.to - fade.from) * fade.easing.apply(phase);
            }
            for pulse in &item.pulses {
                let f = 1.0 + pulse.amp * (TAU * t_ms / pulse.period_ms + pulse.phase_rad).sin();
                match pulse.property {
                    PulseProperty::Scale => scale_mult *= f,
                    PulseProperty::Alpha => alpha_mult *= f,
                }
            }

            let mut scale = Vec2::new(
                item.base_scale.x * scale_mult,
                item.base_scale.y * scale_mult,
            );
            let mut alpha = item.base_alpha * alpha_mult;

            // Shockwave overrides, rather than stacks with, the basic result.
            for fx in &item.advanced {
                if let AdvancedFx::Shockwave {
                    period_ms,
                    scale_amp,
                    alpha_dip,
                } = fx
                {
                    let phase = (t_ms % period_ms) / period_ms;
                    let wave = (PI * phase).sin();
                    scale = Vec2::new(
                        item.base_scale.x * (1.0 + scale_amp * wave),
                        item.base_scale.y * (1.0 + scale_amp * wave),
                    );
                    alpha = item.base_alpha * (1.0 - alpha_dip * wave);
                }
            }

            layer.sprite.set_scale(scale.x, scale.y);
            layer.sprite.set_alpha(alpha.clamp(0.0, 1.0));

            // Tilt rides on whatever rotation spin/orbit/clock produced;
            // only the incremental change is added.
            if let Some(tilt) = item.tilt.as_mut() {
                let target = match tilt.mode {
                    TiltMode::Time => tilt.max_rad * (TAU * t_ms / tilt.period_ms).sin(),
                    TiltMode::Pointer => pointer
                        .map(|p| p.x.clamp(-1.0, 1.0) * tilt.max_rad)
                        .unwrap_or(tilt.prev_rad),
                    TiltMode::Device => 0.0,
                };
                let delta = target - tilt.prev_rad;
                let rot = layer.sprite.rotation();
                layer.sprite.set_rotation(rot + delta);
                tilt.prev_rad = target;
            }

            for fx in &mut item.advanced {
                match fx {
                    AdvancedFx::Aura {
                        aura,
                        scale_mult,
                        period_ms,
                    } => {
                        if let Some(sprite) = self.auras.get_mut(*aura) {
                            let pos = layer.sprite.position();
                            sprite.set_position(pos.x, pos.y);
                            sprite.set_rotation(layer.sprite.rotation());
                            let breath = 1.0 + 0.15 * (TAU * t_ms / *period_ms).sin();
                            sprite.set_scale(
                                item.base_scale.x * *scale_mult * breath,
                                item.base_scale.y * *scale_mult * breath,
                            );
                        }
                    }
                    AdvancedFx::Distort {
                        amp_px,
                        freq_hz,
                        phase_x,
                        phase_y,
                        orbit_driven,
                        prev,
                    } => {
                        let jitter = Vec2::new(
                            *amp_px * (TAU * *freq_hz * elapsed_secs + *phase_x).sin(),
                            *amp_px * (TAU * *freq_hz * 1.13 * elapsed_secs + *phase_y).sin(),
                        );
                        let pos = layer.sprite.position();
                        // Orbit placement rewrites the position each frame and
                        // wipes the previous jitter with it.
                        let applied = if *orbit_driven { jitter } else { jitter - *prev };
                        layer.sprite.set_position(pos.x + applied.x, pos.y + applied.y);
                        *prev = jitter;
                    }
                    AdvancedFx::Shockwave { .. } => {}
                }
            }
        }
        Ok(())
    }

    /// Reset the delta trackers. The host reapplies static transforms right
    /// after recompute, which wipes any tilt/jitter currently applied, so the
    /// trackers must start from zero again.
    pub fn recompute(&mut self, _elapsed_secs: f64, _layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        for item in &mut self.items {
            if let Some(tilt) = item.tilt.as_mut() {
                tilt.prev_rad = 0.0;
            }
            for fx in &mut item.advanced {
                if let AdvancedFx::Distort { prev, .. } = fx {
                    *prev = Vec2::ZERO;
                }
            }
        }
        Ok(())
    }

    /// Destroy aura sprites and drop all items. Idempotent.
    pub fn dispose(&mut self) {
        self.auras.clear();
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/effects.rs"]
mod tests;
