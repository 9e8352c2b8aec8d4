//! Key-based reconciliation of two child collections.

use std::collections::{BTreeMap, BTreeSet};

/// Matches `original` against `update` by `key` and calls `visit` once per
/// key, in ascending key order:
///
/// * `(Some, None)` for keys only in `original`,
/// * `(None, Some)` for keys only in `update`,
/// * `(Some, Some)` for keys present on both sides.
///
/// When a side holds several elements with the same key, the first one in
/// declared order is used.
pub fn reconcile<T, K>(
    original: Vec<T>,
    update: Vec<T>,
    key: impl Fn(&T) -> K,
    mut visit: impl FnMut(Option<T>, Option<T>),
) where
    K: Ord + Clone,
{
    let mut originals = index(original, &key);
    let mut updates = index(update, &key);
    let keys: BTreeSet<K> = originals.keys().chain(updates.keys()).cloned().collect();
    for key in keys {
        visit(originals.remove(&key), updates.remove(&key));
    }
}

fn index<T, K: Ord>(items: Vec<T>, key: &impl Fn(&T) -> K) -> BTreeMap<K, T> {
    let mut indexed = BTreeMap::new();
    for item in items {
        indexed.entry(key(&item)).or_insert(item);
    }
    indexed
}
