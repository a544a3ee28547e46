use super::*;
use crate::scene::memory::MemoryBackend;

#[test]
fn batches_are_deduplicated_within_and_across_calls() {
    let mut backend = MemoryBackend::new();
    let probe = backend.probe();
    let mut cache = AssetCache::new();

    cache.preload_batch(
        &mut backend,
        &["a.png".to_string(), "b.png".to_string(), "a.png".to_string()],
    );
    assert_eq!(probe.preloaded().len(), 2);
    assert_eq!(cache.len(), 2);

    // Second build referencing the same assets plus one new URL.
    cache.preload_batch(&mut backend, &["a.png".to_string(), "c.png".to_string()]);
    let all = probe.preloaded();
    assert_eq!(all.len(), 3);
    assert!(cache.contains("c.png"));
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut backend = MemoryBackend::new();
    let probe = backend.probe();
    let mut cache = AssetCache::new();
    cache.preload_batch(&mut backend, &[]);
    assert!(probe.preloaded().is_empty());
    assert!(cache.is_empty());
}

#[test]
fn dispose_all_forgets_urls() {
    let mut backend = MemoryBackend::new();
    let mut cache = AssetCache::new();
    cache.preload_batch(&mut backend, &["a.png".to_string()]);
    assert!(!cache.is_empty());
    cache.dispose_all();
    assert!(cache.is_empty());
    assert!(!cache.contains("a.png"));
}
