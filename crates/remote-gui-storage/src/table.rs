//! The global storage table.
//!
//! A process-wide mapping from [`Id`] to runtime values with lookup in both
//! directions. Lookup by value is a linear scan using identity, not structural
//! equality. It is only used to re-derive ids for values whose id was lost,
//! so it stays off the hot path.

use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::id::{Id, IdAllocator};

/// Identity comparison used by reverse lookup.
///
/// Reference values must compare by address, so that two distinct objects
/// with equal contents resolve to two distinct ids.
pub trait Identity {
    fn same_identity(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Rc<T> {
    fn same_identity(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

/// Counters describing table usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub stored: u64,
    pub removed: u64,
    pub peak: u64,
}

/// Runtime-side table translating ids to values and back.
pub struct GlobalStorage<V> {
    table: DashMap<Id, V>,
    allocator: IdAllocator,
    stored: AtomicU64,
    removed: AtomicU64,
    peak: AtomicU64,
}

impl<V: Identity> GlobalStorage<V> {
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
            allocator: IdAllocator::new(),
            stored: AtomicU64::new(0),
            removed: AtomicU64::new(0),
            peak: AtomicU64::new(0),
        }
    }

    /// Store `value` under a fresh id that is not present in the table.
    pub fn store(&self, value: V) -> Id {
        self.store_with(|| self.allocator.candidate(), value)
    }

    fn store_with(&self, mut next: impl FnMut() -> Id, value: V) -> Id {
        let id = loop {
            let id = next();
            match self.table.entry(id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                    break id;
                }
                Entry::Occupied(_) => {
                    tracing::warn!(%id, "identifier collision, drawing a new candidate");
                }
            }
        };

        let stored = self.stored.fetch_add(1, Ordering::Relaxed) + 1;
        let live = stored.saturating_sub(self.removed.load(Ordering::Relaxed));
        self.peak.fetch_max(live, Ordering::Relaxed);

        id
    }

    /// Look up the value stored under `id`.
    pub fn get(&self, id: &str) -> Option<V>
    where
        V: Clone,
    {
        self.table.get(id).map(|entry| entry.value().clone())
    }

    /// Run `f` against the value stored under `id` without cloning it.
    pub fn with<T>(&self, id: &str, f: impl FnOnce(&V) -> T) -> Option<T> {
        self.table.get(id).map(|entry| f(entry.value()))
    }

    /// Reverse lookup: find the id of an entry identical to `value`.
    pub fn find(&self, value: &V) -> Option<Id> {
        self.table
            .iter()
            .find(|entry| entry.value().same_identity(value))
            .map(|entry| entry.key().clone())
    }

    /// Delete the entry for `id`. Absent ids are ignored.
    pub fn remove(&self, id: &str) -> Option<V> {
        let removed = self.table.remove(id).map(|(_, value)| value);
        if removed.is_some() {
            self.removed.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.table.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.table.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Drop every entry (used when the runtime shuts down).
    pub fn clear(&self) {
        let count = self.table.len() as u64;
        self.table.clear();
        self.removed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn stats(&self) -> StorageStats {
        StorageStats {
            stored: self.stored.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            peak: self.peak.load(Ordering::Relaxed),
        }
    }
}

impl<V: Identity> Default for GlobalStorage<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, PartialEq)]
    struct Widget {
        label: &'static str,
    }

    #[test]
    fn test_store_then_get_returns_value() {
        let storage = GlobalStorage::new();
        let widget = Rc::new(Widget { label: "ok" });
        let id = storage.store(widget.clone());

        let resolved = storage.get(id.as_str()).unwrap();
        assert!(Rc::ptr_eq(&resolved, &widget));
        assert!(storage.contains(id.as_str()));
    }

    #[test]
    fn test_remove_then_get_reports_not_found() {
        let storage = GlobalStorage::new();
        let id = storage.store(Rc::new(Widget { label: "gone" }));

        assert!(storage.remove(id.as_str()).is_some());
        assert!(storage.get(id.as_str()).is_none());
        assert!(storage.find(&Rc::new(Widget { label: "gone" })).is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let storage: GlobalStorage<Rc<Widget>> = GlobalStorage::new();
        assert!(storage.remove("missing").is_none());
        assert_eq!(storage.stats().removed, 0);
    }

    #[test]
    fn test_ids_are_unique_across_many_allocations() {
        let storage = GlobalStorage::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = storage.store(Rc::new(Widget { label: "x" }));
            assert!(seen.insert(id), "duplicate id handed out");
        }
        assert_eq!(storage.len(), 10_000);
    }

    #[test]
    fn test_store_skips_occupied_candidates() {
        let storage = GlobalStorage::new();
        let original = Rc::new(Widget { label: "first" });
        storage.store_with(|| Id::from("a"), original.clone());

        let mut scripted = vec![Id::from("b"), Id::from("a")];
        let mut draws = 0;
        let id = storage.store_with(
            || {
                draws += 1;
                scripted.pop().unwrap()
            },
            Rc::new(Widget { label: "second" }),
        );

        assert_eq!(id, "b");
        assert_eq!(draws, 2);
        assert!(Rc::ptr_eq(&storage.get("a").unwrap(), &original));
        assert_eq!(storage.stats().stored, 2);
    }

    #[test]
    fn test_concurrent_stores_never_share_an_id() {
        let storage: GlobalStorage<Arc<Widget>> = GlobalStorage::new();
        let ids: Vec<Id> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        (0..500)
                            .map(|_| storage.store(Arc::new(Widget { label: "t" })))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect()
        });

        let distinct: HashSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), 2_000);
        assert_eq!(storage.len(), 2_000);
    }

    #[test]
    fn test_reverse_lookup_uses_identity() {
        let storage = GlobalStorage::new();
        let first = Rc::new(Widget { label: "same" });
        let second = Rc::new(Widget { label: "same" });
        assert_eq!(first, second);

        let first_id = storage.store(first.clone());
        let second_id = storage.store(second.clone());

        assert_ne!(first_id, second_id);
        assert_eq!(storage.find(&first), Some(first_id));
        assert_eq!(storage.find(&second), Some(second_id));
    }

    #[test]
    fn test_with_borrows_in_place() {
        let storage = GlobalStorage::new();
        let id = storage.store(Rc::new(Widget { label: "peek" }));
        assert_eq!(storage.with(id.as_str(), |w| w.label), Some("peek"));
        assert_eq!(storage.with("missing", |w| w.label), None);
    }

    #[test]
    fn test_stats_track_peak() {
        let storage = GlobalStorage::new();
        let a = storage.store(Rc::new(Widget { label: "a" }));
        let _b = storage.store(Rc::new(Widget { label: "b" }));
        storage.remove(a.as_str());
        let _c = storage.store(Rc::new(Widget { label: "c" }));

        assert_eq!(
            storage.stats(),
            StorageStats {
                stored: 3,
                removed: 1,
                peak: 2,
            }
        );

        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.stats().removed, 3);
    }
}
