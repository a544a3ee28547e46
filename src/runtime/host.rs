//! Render host: frame clock, lifecycle and teardown.
//!
//! The host owns the built layers and the four behavior managers, advances
//! the elapsed-time accumulator, forwards resize events and guarantees full
//! teardown on dispose. Everything runs on one logical thread; managers tick
//! synchronously in a fixed order within each frame.

use kurbo::Point;

use crate::{
    behavior::{
        clock::ClockManager,
        effects::{CapabilityPolicy, EffectManager, HeuristicCapability},
        orbit::OrbitManager,
        spin::SpinManager,
    },
    config::model::LogicConfig,
    foundation::error::{OrreryError, OrreryResult},
    scene::{
        backend::{MountOptions, SpriteBackend},
        builder::{BuiltLayer, apply_static_transform, build_scene},
        cache::AssetCache,
    },
    stage::coords::{StageTransform, calculate_transform},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Host lifecycle states. `Disposed` is terminal.
pub enum HostState {
    /// No scene mounted yet.
    Unmounted,
    /// Mount in progress.
    Mounting,
    /// Scene mounted, frame loop may tick.
    Running,
    /// Torn down; the host cannot be reused.
    Disposed,
}

/// Owns the scene, the managers and the per-frame clock.
pub struct RenderHost {
    state: HostState,
    backend: Box<dyn SpriteBackend>,
    capability: Box<dyn CapabilityPolicy>,
    cache: AssetCache,
    layers: Vec<BuiltLayer>,
    spin: Option<SpinManager>,
    clock: Option<ClockManager>,
    orbit: Option<OrbitManager>,
    effects: Option<EffectManager>,
    stage: StageTransform,
    elapsed_secs: f64,
    pointer: Option<Point>,
    dispose_requested: bool,
}

impl RenderHost {
    /// Build an unmounted host over an explicitly chosen backend.
    pub fn new(backend: Box<dyn SpriteBackend>) -> Self {
        Self {
            state: HostState::Unmounted,
            backend,
            capability: Box::new(HeuristicCapability::default()),
            cache: AssetCache::new(),
            layers: Vec::new(),
            spin: None,
            clock: None,
            orbit: None,
            effects: None,
            stage: StageTransform::default(),
            elapsed_secs: 0.0,
            pointer: None,
            dispose_requested: false,
        }
    }

    /// Replace the advanced-effect capability policy before mounting.
    pub fn with_capability_policy(mut self, policy: Box<dyn CapabilityPolicy>) -> Self {
        self.capability = policy;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HostState {
        self.state
    }

    /// Accumulated elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Built layers in draw order.
    pub fn layers(&self) -> &[BuiltLayer] {
        &self.layers
    }

    /// Current stage transform.
    pub fn stage_transform(&self) -> StageTransform {
        self.stage
    }

    /// Build the scene and initialize the behavior managers.
    ///
    /// Fails if the host is not `Unmounted`, if the surface cannot be
    /// prepared (fatal, no retry) or if the configuration is invalid. If a
    /// dispose request arrived while mounting, everything just produced is
    /// torn down instead of transitioning to `Running`.
    #[tracing::instrument(skip(self, config, options))]
    pub fn mount(&mut self, config: &LogicConfig, options: &MountOptions) -> OrreryResult<()> {
        match self.state {
            HostState::Unmounted => {}
            HostState::Disposed => {
                return Err(OrreryError::scene("cannot mount a disposed host"));
            }
            HostState::Mounting | HostState::Running => {
                return Err(OrreryError::scene("mount while already mounted"));
            }
        }
        self.state = HostState::Mounting;

        if let Err(err) = self.backend.configure_surface(options) {
            self.state = HostState::Unmounted;
            return Err(err);
        }

        let scene = match build_scene(config, self.backend.as_mut(), &mut self.cache) {
            Ok(s) => s,
            Err(err) => {
                self.backend.release_surface();
                self.state = HostState::Unmounted;
                return Err(err);
            }
        };
        self.layers = scene.layers;

        if config.has_animation() {
            let spin = SpinManager::init(&self.layers);
            let clock = ClockManager::init(&self.layers, |i| spin.nominal_spin(i));
            let orbit = OrbitManager::init(&self.layers, |i| spin.nominal_spin(i));
            let effects = EffectManager::init(
                &self.layers,
                self.backend.as_mut(),
                self.capability.as_ref(),
            );

            self.clock = clock.has_work().then_some(clock);
            self.orbit = orbit.has_work().then_some(orbit);
            self.effects = effects.has_effects().then_some(effects);
            self.spin = spin.has_work().then_some(spin);
        }

        if self.dispose_requested {
            tracing::debug!("dispose requested during mount, tearing down");
            self.teardown();
            self.state = HostState::Disposed;
            return Ok(());
        }

        self.backend.apply_stage_transform(&self.stage);
        self.elapsed_secs = 0.0;
        self.state = HostState::Running;
        tracing::debug!(layers = self.layers.len(), "mounted");
        Ok(())
    }

    /// Advance the frame clock and tick every manager in fixed order:
    /// spin, clock, orbit, effects.
    ///
    /// A failure inside one manager is logged and does not prevent the
    /// others from ticking.
    pub fn tick_frame(&mut self, delta_ms: f64) {
        if self.state != HostState::Running {
            return;
        }
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_secs += delta_ms / 1000.0;
        }
        let t = self.elapsed_secs;

        if let Some(m) = self.spin.as_mut()
            && let Err(err) = m.tick(t, &mut self.layers)
        {
            tracing::warn!(%err, "spin tick failed");
        }
        if let Some(m) = self.clock.as_mut()
            && let Err(err) = m.tick(&mut self.layers)
        {
            tracing::warn!(%err, "clock tick failed");
        }
        if let Some(m) = self.orbit.as_mut()
            && let Err(err) = m.tick(t, &mut self.layers)
        {
            tracing::warn!(%err, "orbit tick failed");
        }
        if let Some(m) = self.effects.as_mut()
            && let Err(err) = m.tick(t, &mut self.layers, self.pointer)
        {
            tracing::warn!(%err, "effects tick failed");
        }
    }

    /// Recompute viewport-derived geometry after a resize.
    ///
    /// Managers refresh their derived state from the current visual state
    /// first, then every layer's static base transform is reapplied; the
    /// next frame re-derives all animated properties from elapsed time.
    /// Manager failures are isolated.
    pub fn resize(&mut self, viewport_w: f64, viewport_h: f64) {
        if self.state != HostState::Running {
            return;
        }
        self.stage = calculate_transform(viewport_w, viewport_h);
        self.backend.apply_stage_transform(&self.stage);

        let t = self.elapsed_secs;
        if let Some(m) = self.spin.as_mut()
            && let Err(err) = m.recompute(t, &mut self.layers)
        {
            tracing::warn!(%err, "spin recompute failed");
        }
        if let Some(m) = self.clock.as_mut()
            && let Err(err) = m.recompute(t, &mut self.layers)
        {
            tracing::warn!(%err, "clock recompute failed");
        }
        if let Some(m) = self.orbit.as_mut()
            && let Err(err) = m.recompute(t, &mut self.layers)
        {
            tracing::warn!(%err, "orbit recompute failed");
        }
        if let Some(m) = self.effects.as_mut()
            && let Err(err) = m.recompute(t, &mut self.layers)
        {
            tracing::warn!(%err, "effects recompute failed");
        }

        for layer in &mut self.layers {
            apply_static_transform(layer);
        }
    }

    /// Update the normalized pointer position (`[-1, 1]` per axis) consumed
    /// by pointer-mode tilt.
    pub fn set_pointer(&mut self, norm_x: f64, norm_y: f64) {
        self.pointer = Some(Point::new(norm_x, norm_y));
    }

    /// Tear everything down. Safe to call repeatedly and from a partially
    /// initialized state; every cleanup step runs even if a previous one
    /// found nothing to do.
    pub fn dispose(&mut self) {
        match self.state {
            HostState::Disposed => return,
            HostState::Mounting => {
                self.dispose_requested = true;
                return;
            }
            HostState::Unmounted | HostState::Running => {}
        }
        self.teardown();
        self.state = HostState::Disposed;
        tracing::debug!("disposed");
    }

    fn teardown(&mut self) {
        if let Some(mut m) = self.spin.take() {
            m.dispose();
        }
        if let Some(mut m) = self.clock.take() {
            m.dispose();
        }
        if let Some(mut m) = self.orbit.take() {
            m.dispose();
        }
        if let Some(mut m) = self.effects.take() {
            m.dispose();
        }
        self.layers.clear();
        self.cache.dispose_all();
        self.backend.release_surface();
        self.elapsed_secs = 0.0;
        self.pointer = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/host.rs"]
mod tests;
