use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Kinds of derived values a geometry may cache.
///
/// Projector implementations pick the kind matching what they store;
/// the geometry core gives the entries no meaning of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedKind {
    /// Per-angle projection matrices.
    ProjectionMatrices,
    /// Precomputed source positions along the motion grid.
    SourcePositions,
    /// Precomputed detector frames (reference points and rotations).
    DetectorFrames,
}

/// Type-erased cached value.
pub type CacheValue = Arc<dyn Any + Send + Sync>;

/// Typed memoization slots owned by a geometry instance.
///
/// Geometries are immutable after construction; the cache is the one
/// exception and is internally synchronized so a shared geometry can be
/// populated from any thread. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct DerivedCache {
    slots: Mutex<HashMap<DerivedKind, CacheValue>>,
}

impl DerivedCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<DerivedKind, CacheValue>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the cached value of the given kind, if present and of the
    /// requested type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, kind: DerivedKind) -> Option<Arc<T>> {
        self.slots()
            .get(&kind)
            .cloned()
            .and_then(|value| Arc::downcast(value).ok())
    }

    /// Stores a value under the given kind, replacing any previous entry.
    pub fn insert<T: Any + Send + Sync>(&self, kind: DerivedKind, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.slots().insert(kind, value.clone());
        value
    }

    /// Returns the cached value of the given kind, computing and storing
    /// it first if absent or of a different type.
    pub fn get_or_insert_with<T, F>(&self, kind: DerivedKind, compute: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let mut slots = self.slots();
        if let Some(value) = slots.get(&kind).cloned() {
            if let Ok(typed) = Arc::downcast(value) {
                return typed;
            }
        }
        let value = Arc::new(compute());
        slots.insert(kind, value.clone());
        value
    }

    /// Returns whether a value of the given kind is cached.
    #[must_use]
    pub fn is_cached(&self, kind: DerivedKind) -> bool {
        self.slots().contains_key(&kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_round_trips() {
        let cache = DerivedCache::new();
        assert!(!cache.is_cached(DerivedKind::ProjectionMatrices));

        cache.insert(DerivedKind::ProjectionMatrices, vec![1.0_f64, 2.0]);
        assert!(cache.is_cached(DerivedKind::ProjectionMatrices));

        let value = cache
            .get::<Vec<f64>>(DerivedKind::ProjectionMatrices)
            .unwrap();
        assert_eq!(*value, vec![1.0, 2.0]);
    }

    #[test]
    fn get_with_wrong_type_is_none() {
        let cache = DerivedCache::new();
        cache.insert(DerivedKind::SourcePositions, 42_u32);
        assert!(cache.get::<String>(DerivedKind::SourcePositions).is_none());
    }

    #[test]
    fn get_or_insert_computes_once() {
        let cache = DerivedCache::new();
        let first = cache.get_or_insert_with(DerivedKind::DetectorFrames, || String::from("a"));
        let second = cache.get_or_insert_with(DerivedKind::DetectorFrames, || String::from("b"));
        assert_eq!(*first, "a");
        assert_eq!(*second, "a");
    }
}
