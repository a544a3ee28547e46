//! Rendering backend capability interface.
//!
//! The engine never draws; it mutates sprite transform state and leaves
//! rasterization to whatever backend the host mounted. Backends are chosen
//! explicitly at mount time, never inferred by probing object shape.

use kurbo::{Point, Vec2};

use crate::{foundation::error::OrreryResult, stage::coords::StageTransform};

#[derive(Clone, Copy, Debug)]
/// Surface options recognized at mount time.
pub struct MountOptions {
    /// Cap on the device pixel ratio used by the surface.
    pub dpr_cap: Option<f64>,
    /// Background alpha for the surface clear color.
    pub background_alpha: f64,
    /// Request an antialiased drawing context.
    pub antialias: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            dpr_cap: None,
            background_alpha: 0.0,
            antialias: true,
        }
    }
}

/// A renderable textured quad with mutable transform state.
///
/// All coordinates are logical-canvas pixels; the backend applies the stage
/// transform when drawing. Dropping the box destroys the sprite.
pub trait Sprite {
    /// Current position of the sprite's anchor (center).
    fn position(&self) -> Point;
    /// Move the sprite's anchor.
    fn set_position(&mut self, x: f64, y: f64);
    /// Current rotation in radians.
    fn rotation(&self) -> f64;
    /// Set rotation in radians.
    fn set_rotation(&mut self, rad: f64);
    /// Current opacity in `[0, 1]`.
    fn alpha(&self) -> f64;
    /// Set opacity.
    fn set_alpha(&mut self, alpha: f64);
    /// Current scale factors.
    fn scale(&self) -> Vec2;
    /// Set scale factors.
    fn set_scale(&mut self, sx: f64, sy: f64);
    /// Current draw order.
    fn z_index(&self) -> i32;
    /// Set draw order.
    fn set_z_index(&mut self, z: i32);
    /// Whether the sprite is currently shown.
    fn visible(&self) -> bool;
    /// Show or hide the sprite without destroying it.
    fn set_visible(&mut self, visible: bool);
    /// Intrinsic texture size in logical pixels, if resolvable.
    fn size(&self) -> Option<(f64, f64)>;
}

/// Sprite factory and surface control provided by a rendering backend.
pub trait SpriteBackend {
    /// Prepare the drawing surface. A failure here is a fatal mount error;
    /// the engine performs no automatic retry.
    fn configure_surface(&mut self, options: &MountOptions) -> OrreryResult<()>;

    /// Create one sprite from a resolved asset URL.
    fn create_sprite(&mut self, url: &str) -> OrreryResult<Box<dyn Sprite>>;

    /// Best-effort batch preload of asset URLs. Individual failures should
    /// be swallowed by the backend; a returned error is logged, not fatal.
    fn preload_assets(&mut self, urls: &[String]) -> OrreryResult<()>;

    /// Apply the stage cover transform to the drawing surface.
    fn apply_stage_transform(&mut self, transform: &StageTransform);

    /// Whether the backend reports a hardware-accelerated context. Consumed
    /// by the advanced-effect capability gate.
    fn hardware_accelerated(&self) -> bool {
        false
    }

    /// Detach and release the drawing surface. Must be idempotent.
    fn release_surface(&mut self);
}
