//! Constant-rate rotation.

use std::collections::HashMap;

use crate::{
    config::model::SpinDir,
    foundation::{error::OrreryResult, math},
    scene::builder::BuiltLayer,
};

struct SpinItem {
    layer: usize,
    base_angle: f64,
    rad_per_sec: f64,
    dir: f64,
}

/// Drives layers with a positive spin RPM at a constant angular rate.
///
/// Rotation is re-derived from elapsed time on every tick (never integrated
/// incrementally), so replaying the same elapsed time yields the same angle.
/// Clock-enabled layers are excluded from rotation writes, but their nominal
/// RPM is still recorded for the orbit manager's spin-on-orbit composition.
#[derive(Default)]
pub struct SpinManager {
    items: Vec<SpinItem>,
    nominal: HashMap<usize, (f64, f64)>, // layer index -> (rpm, dir signum)
}

impl SpinManager {
    /// Capture per-layer spin parameters from the built scene.
    ///
    /// `base_angle` is the sprite's rotation at init time, i.e. the static
    /// base rotation applied by the scene builder.
    pub fn init(layers: &[BuiltLayer]) -> Self {
        let mut items = Vec::new();
        let mut nominal = HashMap::new();

        for (idx, layer) in layers.iter().enumerate() {
            let rpm = math::clamp_rpm_60(layer.cfg.spin_rpm.unwrap_or(0.0));
            if rpm <= 0.0 {
                continue;
            }
            let dir = layer.cfg.spin_dir.unwrap_or(SpinDir::Cw).signum();
            nominal.insert(idx, (rpm, dir));

            // Clock-enabled layers own their rotation through the clock
            // manager; only the nominal rate is kept.
            if layer.cfg.clock_enabled() {
                continue;
            }
            items.push(SpinItem {
                layer: idx,
                base_angle: layer.sprite.rotation(),
                rad_per_sec: math::rpm_to_rad_per_sec(rpm),
                dir,
            });
        }

        Self { items, nominal }
    }

    /// Nominal `(rpm, direction)` for a layer, including clock-owned layers.
    pub fn nominal_spin(&self, layer: usize) -> Option<(f64, f64)> {
        self.nominal.get(&layer).copied()
    }

    /// Whether any layer is actively spin-managed.
    pub fn has_work(&self) -> bool {
        !self.items.is_empty()
    }

    /// Set each managed sprite's absolute rotation for the elapsed time.
    pub fn tick(&mut self, elapsed_secs: f64, layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        for item in &self.items {
            if let Some(layer) = layers.get_mut(item.layer) {
                layer
                    .sprite
                    .set_rotation(item.base_angle + item.dir * item.rad_per_sec * elapsed_secs);
            }
        }
        Ok(())
    }

    /// Spin has no viewport-dependent geometry.
    pub fn recompute(&mut self, _elapsed_secs: f64, _layers: &mut [BuiltLayer]) -> OrreryResult<()> {
        Ok(())
    }

    /// Drop all captured items. Idempotent.
    pub fn dispose(&mut self) {
        self.items.clear();
        self.nominal.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/spin.rs"]
mod tests;
