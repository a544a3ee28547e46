//! Orrery is a deterministic, declarative 2D layer animation engine.
//!
//! A JSON scene description ([`LogicConfig`]) places sprite layers on a
//! fixed 2048x2048 logical canvas and attaches optional behaviors: constant
//! spin, circular orbit, real-time clock hands and time-based effects. The
//! engine mutates sprite transform state every frame; drawing is delegated
//! to a backend chosen by the host ([`SpriteBackend`]).
//!
//! # Pipeline overview
//!
//! 1. **Build**: `LogicConfig -> BuiltScene` (resolve images, create sprites
//!    in deterministic order, apply static transforms)
//! 2. **Mount**: [`RenderHost::mount`] initializes the behavior managers
//!    over the built layers
//! 3. **Tick**: the host's frame loop calls [`RenderHost::tick_frame`],
//!    driving spin, clock, orbit and effects in that fixed order
//! 4. **Resize**: [`RenderHost::resize`] recomputes the cover transform and
//!    viewport-derived geometry without visible jumps
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic replay**: animation state is re-derived from elapsed
//!   time each tick, never integrated incrementally (the clock manager
//!   samples the wall clock instead).
//! - **Best-effort scenes**: a layer that fails to resolve or load is
//!   dropped with a warning; the rest of the scene proceeds.
//! - **No drawing**: the engine only mutates sprite transform state.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod behavior;
mod config;
mod foundation;
mod runtime;
mod scene;
mod stage;

pub use behavior::clock::{ClockManager, WallTime, hand_angle, sample_wall_time};
pub use behavior::effects::{
    AllowAllCapability, CapabilityPolicy, EffectManager, HeuristicCapability,
};
pub use behavior::orbit::OrbitManager;
pub use behavior::spin::SpinManager;
pub use config::effects::{
    Easing, EffectKind, PulseProperty, TiltMode, fold_pingpong, parse_effect,
};
pub use config::model::{
    ClockConfig, ClockFormat, ClockHand, ClockSourceConfig, EffectInstance, HandPoint, ImageRef,
    ImageRegistry, LayerConfig, LogicConfig, OrbitOrientPolicy, PositionPct, ScalePct, SpinDir,
    TimeZoneSpec, zindex_from_id,
};
pub use foundation::error::{OrreryError, OrreryResult};
pub use foundation::math::{
    MAX_RPM, clamp_rpm_60, deg_to_rad, normalize_angle_rad, pct_to_units, rad_to_deg,
    rpm_to_rad_per_sec,
};
pub use runtime::host::{HostState, RenderHost};
pub use scene::backend::{MountOptions, Sprite, SpriteBackend};
pub use scene::builder::{BuiltLayer, BuiltScene, apply_static_transform, build_scene};
pub use scene::cache::AssetCache;
pub use scene::memory::{MemoryBackend, MemoryProbe, MemorySprite};
pub use stage::coords::{
    LOGICAL_SIZE, StageTransform, calculate_transform, is_within_stage,
};
