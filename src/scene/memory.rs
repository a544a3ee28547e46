//! Headless in-memory backend.
//!
//! Always available: holds sprite transform state without drawing anything.
//! Used by the test suite and by embedders that want to run the engine
//! without a drawable surface (e.g. server-side scene inspection).

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use kurbo::{Point, Vec2};

use crate::{
    foundation::error::{OrreryError, OrreryResult},
    scene::backend::{MountOptions, Sprite, SpriteBackend},
    stage::coords::StageTransform,
};

/// Default intrinsic sprite size when none is configured.
const DEFAULT_SPRITE_SIZE: (f64, f64) = (128.0, 128.0);

#[derive(Clone, Debug, Default)]
/// Shared observation handle into a [`MemoryBackend`].
///
/// Remains valid after the backend is boxed and handed to the render host.
pub struct MemoryProbe {
    live: Arc<AtomicUsize>,
    preloaded: Arc<Mutex<Vec<String>>>,
    stage: Arc<Mutex<Option<StageTransform>>>,
}

impl MemoryProbe {
    /// Number of sprites currently alive (not yet destroyed).
    pub fn live_sprites(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// URLs passed to `preload_assets`, in call order.
    pub fn preloaded(&self) -> Vec<String> {
        self.preloaded.lock().expect("probe lock").clone()
    }

    /// Last stage transform applied to the surface.
    pub fn stage_transform(&self) -> Option<StageTransform> {
        *self.stage.lock().expect("probe lock")
    }
}

/// In-memory sprite; plain transform state plus a liveness counter.
pub struct MemorySprite {
    url: String,
    position: Point,
    rotation: f64,
    alpha: f64,
    scale: Vec2,
    z_index: i32,
    visible: bool,
    size: Option<(f64, f64)>,
    live: Arc<AtomicUsize>,
}

impl MemorySprite {
    /// Asset URL the sprite was created from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Sprite for MemorySprite {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.position = Point::new(x, y);
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, rad: f64) {
        self.rotation = rad;
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, sx: f64, sy: f64) {
        self.scale = Vec2::new(sx, sy);
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn set_z_index(&mut self, z: i32) {
        self.z_index = z;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn size(&self) -> Option<(f64, f64)> {
        self.size
    }
}

impl Drop for MemorySprite {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Headless backend holding sprites as plain state.
pub struct MemoryBackend {
    probe: MemoryProbe,
    sprite_size: Option<(f64, f64)>,
    hardware_accelerated: bool,
    fail_urls: Vec<String>,
    fail_surface: bool,
    surface_released: bool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Build a backend with the default sprite size.
    pub fn new() -> Self {
        Self {
            probe: MemoryProbe::default(),
            sprite_size: Some(DEFAULT_SPRITE_SIZE),
            hardware_accelerated: false,
            fail_urls: Vec::new(),
            fail_surface: false,
            surface_released: false,
        }
    }

    /// Override the intrinsic size reported by created sprites.
    /// `None` simulates sprites with unresolvable dimensions.
    pub fn with_sprite_size(mut self, size: Option<(f64, f64)>) -> Self {
        self.sprite_size = size;
        self
    }

    /// Report a hardware-accelerated context to the capability gate.
    pub fn with_hardware_acceleration(mut self, enabled: bool) -> Self {
        self.hardware_accelerated = enabled;
        self
    }

    /// Make `create_sprite` fail for a specific URL.
    pub fn fail_url(mut self, url: impl Into<String>) -> Self {
        self.fail_urls.push(url.into());
        self
    }

    /// Make `configure_surface` fail, simulating a context that cannot be
    /// created.
    pub fn fail_surface(mut self) -> Self {
        self.fail_surface = true;
        self
    }

    /// Observation handle that stays valid after boxing the backend.
    pub fn probe(&self) -> MemoryProbe {
        self.probe.clone()
    }
}

impl SpriteBackend for MemoryBackend {
    fn configure_surface(&mut self, _options: &MountOptions) -> OrreryResult<()> {
        if self.fail_surface {
            return Err(OrreryError::backend("surface context unavailable"));
        }
        self.surface_released = false;
        Ok(())
    }

    fn create_sprite(&mut self, url: &str) -> OrreryResult<Box<dyn Sprite>> {
        if self.fail_urls.iter().any(|u| u == url) {
            return Err(OrreryError::backend(format!(
                "texture load failed for '{url}'"
            )));
        }
        self.probe.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySprite {
            url: url.to_string(),
            position: Point::ZERO,
            rotation: 0.0,
            alpha: 1.0,
            scale: Vec2::new(1.0, 1.0),
            z_index: 0,
            visible: true,
            size: self.sprite_size,
            live: Arc::clone(&self.probe.live),
        }))
    }

    fn preload_assets(&mut self, urls: &[String]) -> OrreryResult<()> {
        self.probe
            .preloaded
            .lock()
            .expect("probe lock")
            .extend_from_slice(urls);
        Ok(())
    }

    fn apply_stage_transform(&mut self, transform: &StageTransform) {
        *self.probe.stage.lock().expect("probe lock") = Some(*transform);
    }

    fn hardware_accelerated(&self) -> bool {
        self.hardware_accelerated
    }

    fn release_surface(&mut self) {
        self.surface_released = true;
    }
}
