//! Fixed logical canvas and viewport "cover" mapping.
//!
//! All layer placement is expressed against a fixed 2048x2048 logical canvas.
//! The stage transform maps that canvas onto an arbitrary viewport by picking
//! the larger of the two axis scale ratios, so the canvas always fills the
//! viewport (overflow is cropped, never letterboxed).

use kurbo::Point;

/// Side length of the fixed logical canvas, in logical pixels.
pub const LOGICAL_SIZE: f64 = 2048.0;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of fitting the logical canvas onto a viewport under cover scaling.
pub struct StageTransform {
    /// Uniform scale from logical pixels to viewport pixels.
    pub scale: f64,
    /// Horizontal offset of the scaled canvas inside the viewport. Negative
    /// when the canvas overflows the viewport.
    pub offset_x: f64,
    /// Vertical offset of the scaled canvas inside the viewport.
    pub offset_y: f64,
    /// Scaled canvas width (`LOGICAL_SIZE * scale`).
    pub container_w: f64,
    /// Scaled canvas height (`LOGICAL_SIZE * scale`).
    pub container_h: f64,
}

impl Default for StageTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            container_w: LOGICAL_SIZE,
            container_h: LOGICAL_SIZE,
        }
    }
}

impl StageTransform {
    /// Map viewport (client) coordinates to logical canvas coordinates.
    ///
    /// Exact inverse of the forward mapping used to place the canvas; with a
    /// degenerate (zero-scale) transform the input offsets are still removed
    /// but no division is performed.
    pub fn to_stage_coords(&self, client_x: f64, client_y: f64) -> Point {
        if self.scale == 0.0 {
            return Point::new(client_x - self.offset_x, client_y - self.offset_y);
        }
        Point::new(
            (client_x - self.offset_x) / self.scale,
            (client_y - self.offset_y) / self.scale,
        )
    }

    /// Map logical canvas coordinates back to viewport (client) coordinates.
    pub fn to_client_coords(&self, stage: Point) -> Point {
        Point::new(
            stage.x * self.scale + self.offset_x,
            stage.y * self.scale + self.offset_y,
        )
    }
}

/// Compute the cover-scaling transform for a viewport.
///
/// `scale = max(w / LOGICAL_SIZE, h / LOGICAL_SIZE)`; offsets center the
/// scaled canvas so overflow is split symmetrically. Recomputing with an
/// unchanged viewport returns an identical transform.
pub fn calculate_transform(viewport_w: f64, viewport_h: f64) -> StageTransform {
    let w = if viewport_w.is_finite() { viewport_w.max(0.0) } else { 0.0 };
    let h = if viewport_h.is_finite() { viewport_h.max(0.0) } else { 0.0 };

    let scale = (w / LOGICAL_SIZE).max(h / LOGICAL_SIZE);
    let container_w = LOGICAL_SIZE * scale;
    let container_h = LOGICAL_SIZE * scale;

    StageTransform {
        scale,
        offset_x: (w - container_w) / 2.0,
        offset_y: (h - container_h) / 2.0,
        container_w,
        container_h,
    }
}

/// Whether a logical-canvas point lies inside the canvas bounds.
pub fn is_within_stage(x: f64, y: f64) -> bool {
    (0.0..=LOGICAL_SIZE).contains(&x) && (0.0..=LOGICAL_SIZE).contains(&y)
}
