//! Scene construction: configuration in, live sprites out.
//!
//! Layers are created in deterministic order, each isolated against its own
//! failures: an unresolvable image reference or a failed texture load drops
//! that single layer with a warning and the rest of the scene proceeds.

use crate::{
    config::model::{LayerConfig, LogicConfig, zindex_from_id},
    foundation::{error::OrreryResult, math},
    scene::{backend::Sprite, backend::SpriteBackend, cache::AssetCache},
    stage::coords::LOGICAL_SIZE,
};

/// A live sprite paired with its originating configuration.
pub struct BuiltLayer {
    /// Layer id from configuration.
    pub id: String,
    /// Resolved asset URL the sprite was created from.
    pub url: String,
    /// The renderable sprite.
    pub sprite: Box<dyn Sprite>,
    /// Originating layer configuration.
    pub cfg: LayerConfig,
}

/// Result of a scene build: successfully created layers in draw order.
pub struct BuiltScene {
    /// Built layers, sorted by `(z-index, id)`.
    pub layers: Vec<BuiltLayer>,
}

/// Apply a layer's static base transform: percentage placement, percentage
/// scale, base rotation and id-derived z-order.
///
/// Called at build time and again on every resize, since derived geometry is
/// recomputed from the same configuration each time.
pub fn apply_static_transform(layer: &mut BuiltLayer) {
    let cfg = &layer.cfg;
    let x = math::pct_to_units(cfg.position.x_pct, LOGICAL_SIZE);
    let y = math::pct_to_units(cfg.position.y_pct, LOGICAL_SIZE);
    let scale = cfg.scale.unwrap_or_default().pct / 100.0;

    layer.sprite.set_position(x, y);
    layer.sprite.set_scale(scale, scale);
    layer.sprite.set_rotation(math::deg_to_rad(cfg.angle_deg));
    layer.sprite.set_alpha(1.0);
    layer.sprite.set_z_index(zindex_from_id(&cfg.id));
}

/// Build the sprite scene from a realized configuration.
///
/// Validates the config, preloads the deduplicated URL set through the
/// injected cache, then creates one sprite per resolvable layer in
/// `(z-index, id)` order.
#[tracing::instrument(skip(config, backend, cache), fields(layers = config.layers.len()))]
pub fn build_scene(
    config: &LogicConfig,
    backend: &mut dyn SpriteBackend,
    cache: &mut AssetCache,
) -> OrreryResult<BuiltScene> {
    config.validate()?;

    let mut ordered: Vec<&LayerConfig> = config.layers.iter().collect();
    ordered.sort_by(|a, b| {
        (zindex_from_id(&a.id), a.id.as_str()).cmp(&(zindex_from_id(&b.id), b.id.as_str()))
    });

    let urls: Vec<String> = ordered
        .iter()
        .filter_map(|l| l.image_ref.resolve(&config.image_registry))
        .map(str::to_string)
        .collect();
    cache.preload_batch(backend, &urls);

    let mut layers = Vec::with_capacity(ordered.len());
    for cfg in ordered {
        let Some(url) = cfg.image_ref.resolve(&config.image_registry) else {
            tracing::warn!(layer = %cfg.id, "image reference did not resolve, layer skipped");
            continue;
        };
        let sprite = match backend.create_sprite(url) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(layer = %cfg.id, %url, %err, "sprite creation failed, layer skipped");
                continue;
            }
        };
        let mut layer = BuiltLayer {
            id: cfg.id.clone(),
            url: url.to_string(),
            sprite,
            cfg: cfg.clone(),
        };
        apply_static_transform(&mut layer);
        layers.push(layer);
    }

    tracing::debug!(built = layers.len(), "scene build complete");
    Ok(BuiltScene { layers })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
