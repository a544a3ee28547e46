use std::collections::BTreeMap;

use crate::foundation::error::{OrreryError, OrreryResult};

/// Mapping from symbolic image id to a resolved asset URL.
///
/// Entries are rewritten by the host's asset resolver before the config
/// reaches the engine; the engine only performs lookups.
pub type ImageRegistry = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// The declarative scene description consumed by the scene builder.
///
/// A `LogicConfig` is a pure data model deserialized from JSON. Every layer
/// should resolve its image through [`LogicConfig::image_registry`] or carry
/// a direct URL; violations are non-fatal (the layer is dropped with a
/// warning at build time).
pub struct LogicConfig {
    /// Declared layer id order, for authoring/debugging.
    #[serde(default, rename = "layersID")]
    pub layers_id: Vec<String>,
    /// Image id to resolved URL table.
    #[serde(default, rename = "imageRegistry")]
    pub image_registry: ImageRegistry,
    /// Ordered list of visual layers.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
/// Reference to a layer image: registry lookup or direct URL.
pub enum ImageRef {
    /// Look the URL up in the image registry.
    #[serde(rename = "urlId")]
    UrlId {
        /// Registry key.
        id: String,
    },
    /// Use the URL as-is.
    #[serde(rename = "url")]
    Url {
        /// Direct asset URL.
        url: String,
    },
}

impl ImageRef {
    /// Resolve to an asset URL. Returns `None` when a registry id is absent;
    /// the caller is expected to skip the layer with a warning.
    pub fn resolve<'a>(&'a self, registry: &'a ImageRegistry) -> Option<&'a str> {
        match self {
            Self::UrlId { id } => registry.get(id).map(String::as_str),
            Self::Url { url } => Some(url.as_str()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A point expressed as percentages of the logical canvas.
pub struct PositionPct {
    /// Horizontal position, `0..=100`.
    #[serde(rename = "xPct")]
    pub x_pct: f64,
    /// Vertical position, `0..=100`.
    #[serde(rename = "yPct")]
    pub y_pct: f64,
}

impl PositionPct {
    /// Build a percentage point.
    pub fn new(x_pct: f64, y_pct: f64) -> Self {
        Self { x_pct, y_pct }
    }

    /// Center of the canvas.
    pub fn center() -> Self {
        Self::new(50.0, 50.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Uniform scale expressed as a percentage (100 = natural size).
pub struct ScalePct {
    /// Scale percentage.
    pub pct: f64,
}

impl Default for ScalePct {
    fn default() -> Self {
        Self { pct: 100.0 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Rotation direction for spin and orbit.
pub enum SpinDir {
    /// Clockwise (positive angular rate).
    #[default]
    Cw,
    /// Counter-clockwise (negative angular rate).
    Ccw,
}

impl SpinDir {
    /// Signed direction multiplier: `1.0` for cw, `-1.0` for ccw.
    pub fn signum(self) -> f64 {
        match self {
            Self::Cw => 1.0,
            Self::Ccw => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// How an orbiting layer orients itself along its path.
pub enum OrbitOrientPolicy {
    /// Keep whatever rotation other behaviors produce.
    #[default]
    None,
    /// Face along the orbit tangent, unless the layer also spins.
    Auto,
    /// Always face along the orbit tangent plus a fixed offset.
    Override,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which simulated clock hand drives a clock-managed behavior.
pub enum ClockHand {
    /// Not driven by the clock.
    #[default]
    None,
    /// Seconds hand.
    Second,
    /// Minutes hand.
    Minute,
    /// Hours hand.
    Hour,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Wall-clock source for the clock manager.
pub enum TimeZoneSpec {
    /// Local device time.
    #[default]
    Device,
    /// Coordinated universal time.
    Utc,
    /// UTC shifted by [`ClockSourceConfig::tz_offset_minutes`].
    Server,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
/// 12- or 24-hour dial for the hour hand.
pub enum ClockFormat {
    /// 12-hour dial (hour hand completes a turn twice a day).
    #[default]
    H12,
    /// 24-hour dial.
    H24,
}

impl TryFrom<u8> for ClockFormat {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            12 => Ok(Self::H12),
            24 => Ok(Self::H24),
            other => Err(format!("clock format must be 12 or 24, got {other}")),
        }
    }
}

impl From<ClockFormat> for u8 {
    fn from(v: ClockFormat) -> u8 {
        match v {
            ClockFormat::H12 => 12,
            ClockFormat::H24 => 24,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Extra parameters for the `server` time source.
pub struct ClockSourceConfig {
    /// Minutes added to UTC when the `server` source is selected.
    pub tz_offset_minutes: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A hand anchor point given as an angle on the sprite's bounding box.
pub struct HandPoint {
    /// Clock-style angle in degrees (0 = up, clockwise positive).
    pub angle_deg: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Real-time-clock behavior overriding spin and/or orbit for a layer.
pub struct ClockConfig {
    /// Master switch; a disabled clock leaves the layer to spin/orbit.
    #[serde(default)]
    pub enabled: bool,
    /// Orbit center for the orbit hand, as canvas percentages.
    #[serde(default)]
    pub center: Option<PositionPct>,
    /// Geometric base of the hand on the sprite.
    #[serde(default)]
    pub base: Option<HandPoint>,
    /// Geometric tip of the hand on the sprite.
    #[serde(default)]
    pub tip: Option<HandPoint>,
    /// Wall-clock source.
    #[serde(default)]
    pub timezone: TimeZoneSpec,
    /// Hand driving the sprite's rotation.
    #[serde(default)]
    pub spin_hand: ClockHand,
    /// Hand driving the sprite's orbit position.
    #[serde(default)]
    pub orbit_hand: ClockHand,
    /// Interpolate between units using the next-smaller unit's fraction.
    #[serde(default)]
    pub smooth: bool,
    /// Hour dial format.
    #[serde(default)]
    pub format: ClockFormat,
    /// Extra source parameters.
    #[serde(default)]
    pub source: ClockSourceConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Raw effect entry attached to a layer.
///
/// The `type` field selects the effect kind; remaining keys are kind-specific
/// parameters parsed into [`crate::config::effects::EffectKind`] at build
/// time. Unknown or malformed entries are dropped with a warning.
pub struct EffectInstance {
    /// Effect kind identifier (`fade`, `pulse`, `tilt`, `glow`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific parameters.
    #[serde(flatten)]
    pub params: serde_json::Value,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One configured visual layer: placement plus optional animation behaviors.
pub struct LayerConfig {
    /// Unique layer id. The first run of digits determines the default
    /// z-order; ids without digits sort at z = 0.
    pub id: String,
    /// Image reference for the layer sprite.
    pub image_ref: ImageRef,
    /// Center-anchored placement as canvas percentages.
    pub position: PositionPct,
    /// Uniform scale percentage, default 100.
    #[serde(default)]
    pub scale: Option<ScalePct>,
    /// Static base rotation in degrees.
    #[serde(default)]
    pub angle_deg: f64,
    /// Constant spin rate in RPM, clamped to `[0, 60]`.
    #[serde(default, rename = "spinRPM")]
    pub spin_rpm: Option<f64>,
    /// Spin direction.
    #[serde(default)]
    pub spin_dir: Option<SpinDir>,
    /// Constant orbit rate in RPM, clamped to `[0, 60]`.
    #[serde(default, rename = "orbitRPM")]
    pub orbit_rpm: Option<f64>,
    /// Orbit direction.
    #[serde(default)]
    pub orbit_dir: Option<SpinDir>,
    /// Orbit center as canvas percentages, default canvas center.
    #[serde(default)]
    pub orbit_center: Option<PositionPct>,
    /// Explicit starting phase in degrees; when absent the phase is derived
    /// from the layer's configured position.
    #[serde(default)]
    pub orbit_phase_deg: Option<f64>,
    /// Orientation policy along the orbit path.
    #[serde(default)]
    pub orbit_orient_policy: Option<OrbitOrientPolicy>,
    /// Fixed orientation offset in degrees for `auto`/`override` policies.
    #[serde(default)]
    pub orbit_orient_deg: Option<f64>,
    /// Real-time clock override of spin and/or orbit.
    #[serde(default)]
    pub clock: Option<ClockConfig>,
    /// Ordered effect list.
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
}

impl LayerConfig {
    /// Whether the layer's clock behavior is enabled.
    pub fn clock_enabled(&self) -> bool {
        self.clock.as_ref().is_some_and(|c| c.enabled)
    }

    /// Whether the clock drives this layer's orbit position.
    pub fn clock_drives_orbit(&self) -> bool {
        self.clock
            .as_ref()
            .is_some_and(|c| c.enabled && c.orbit_hand != ClockHand::None)
    }

    /// Whether the layer configures any animatable behavior.
    pub fn is_animated(&self) -> bool {
        crate::foundation::math::clamp_rpm_60(self.spin_rpm.unwrap_or(0.0)) > 0.0
            || crate::foundation::math::clamp_rpm_60(self.orbit_rpm.unwrap_or(0.0)) > 0.0
            || self.clock_enabled()
            || !self.effects.is_empty()
    }
}

/// Derive a layer's default z-order from the first run of digits in its id.
///
/// `"layer12-bg"` sorts at 12; ids without digits sort at 0; a digit run
/// too large for `i32` saturates to `i32::MAX`.
pub fn zindex_from_id(id: &str) -> i32 {
    let digits: String = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i32>().unwrap_or(i32::MAX)
}

impl LogicConfig {
    /// Validate structural invariants: unique non-empty layer ids and finite
    /// placement percentages.
    ///
    /// Resolution failures (registry misses) are deliberately not errors;
    /// they are skipped per-layer at build time.
    pub fn validate(&self) -> OrreryResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for layer in &self.layers {
            if layer.id.trim().is_empty() {
                return Err(OrreryError::config("layer id must be non-empty"));
            }
            if !seen.insert(layer.id.as_str()) {
                return Err(OrreryError::config(format!(
                    "duplicate layer id '{}'",
                    layer.id
                )));
            }
            if !layer.position.x_pct.is_finite() || !layer.position.y_pct.is_finite() {
                return Err(OrreryError::config(format!(
                    "layer '{}' position must be finite",
                    layer.id
                )));
            }
            if let Some(s) = layer.scale
                && (!s.pct.is_finite() || s.pct < 0.0)
            {
                return Err(OrreryError::config(format!(
                    "layer '{}' scale pct must be finite and >= 0",
                    layer.id
                )));
            }
            if !layer.angle_deg.is_finite() {
                return Err(OrreryError::config(format!(
                    "layer '{}' angleDeg must be finite",
                    layer.id
                )));
            }
        }
        Ok(())
    }

    /// Whether any layer configures an animatable behavior.
    pub fn has_animation(&self) -> bool {
        self.layers.iter().any(LayerConfig::is_animated)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
