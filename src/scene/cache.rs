//! Session-scoped asset cache.
//!
//! The cache is an explicitly owned object injected into the scene builder
//! (never ambient global state). It dedupes preload requests across scene
//! builds within one application session; the backend owns the actual
//! texture memory.

use std::collections::BTreeSet;

use crate::scene::backend::SpriteBackend;

#[derive(Debug, Default)]
/// Get-or-load URL cache with process-session lifetime.
pub struct AssetCache {
    loaded: BTreeSet<String>,
}

impl AssetCache {
    /// Build an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs recorded as preloaded.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no URL has been preloaded yet.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Whether a URL has already been preloaded this session.
    pub fn contains(&self, url: &str) -> bool {
        self.loaded.contains(url)
    }

    /// Preload every URL not yet cached, as one best-effort batch.
    ///
    /// A backend error is logged and the batch is still marked as attempted;
    /// per-layer sprite creation will surface any real failure later.
    pub fn preload_batch(&mut self, backend: &mut dyn SpriteBackend, urls: &[String]) {
        let missing: Vec<String> = urls
            .iter()
            .filter(|u| !self.loaded.contains(*u))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if missing.is_empty() {
            return;
        }
        if let Err(err) = backend.preload_assets(&missing) {
            tracing::warn!(count = missing.len(), %err, "asset preload batch failed");
        }
        self.loaded.extend(missing);
    }

    /// Forget every cached URL. The backend releases texture memory when its
    /// surface is released.
    pub fn dispose_all(&mut self) {
        self.loaded.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/cache.rs"]
mod tests;
