// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A [`RingMap`] guarded by a single readers-writer lock.
//!
//! # Lock discipline
//!
//! Every method acquires the lock for exactly one operation and releases it before
//! returning:
//!
//! - **Shared (read)**: `capacity`, `len`, `is_empty`, `is_full`, `contains`, `rcontains`,
//!   `find`, `find_if`, `rfind_if`, `traverse`, `rtraverse`, `snapshot`.
//! - **Exclusive (write)**: `push_back`, `pop_front`, `erase`, `clear`.
//!
//! Lookups return owned clones, never references into the guarded storage.
//!
//! # Callbacks
//!
//! Predicates and visitors run while the read lock is held. They must not call back into
//! the same map (the lock is not re-entrant and a nested write deadlocks) and must not
//! block, since a long-running visitor starves writers.
//!
//! # Poisoning
//!
//! [`RingMap`] mutations leave the entries consistent even if a key comparison panics,
//! so a poisoned lock is recovered rather than propagated.

use std::{
    borrow::Borrow,
    fmt::Debug,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use circlemap_core::RWLOCK_POISONED;

use super::ring::RingMap;
use crate::config::RingMapConfig;

/// A thread-safe [`RingMap`] for sharing between threads via `Arc`.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, thread};
///
/// use circlemap_common::cache::shared::SharedRingMap;
///
/// let map = Arc::new(SharedRingMap::new(2));
///
/// thread::scope(|s| {
///     s.spawn(|| map.push_back("a", 1));
///     s.spawn(|| map.push_back("b", 2));
/// });
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.find("a"), Some(1));
/// ```
pub struct SharedRingMap<K, V> {
    inner: RwLock<RingMap<K, V>>,
}

impl<K, V> Debug for SharedRingMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_read() {
            Ok(map) => f
                .debug_struct(stringify!(SharedRingMap))
                .field("inner", &*map)
                .finish(),
            Err(_) => f
                .debug_struct(stringify!(SharedRingMap))
                .field("inner", &"<locked>")
                .finish(),
        }
    }
}

impl<K, V> From<RingMap<K, V>> for SharedRingMap<K, V> {
    fn from(map: RingMap<K, V>) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }
}

impl<K, V> SharedRingMap<K, V>
where
    K: PartialEq,
{
    /// Creates a new empty [`SharedRingMap`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn new_checked(capacity: usize) -> anyhow::Result<Self> {
        Ok(RingMap::new_checked(capacity)?.into())
    }

    /// Creates a new empty [`SharedRingMap`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        RingMap::new(capacity).into()
    }

    /// Creates a new empty [`SharedRingMap`] instance from the given `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn from_config(config: &RingMapConfig) -> anyhow::Result<Self> {
        Ok(RingMap::from_config(config)?.into())
    }

    /// Consumes the wrapper, returning the inner [`RingMap`].
    pub fn into_inner(self) -> RingMap<K, V> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the fixed capacity of the map.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns whether the map is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.read().is_full()
    }

    /// Pushes a key-value pair under the write lock, returning the evicted entry, if any.
    ///
    /// See [`RingMap::push_back`].
    pub fn push_back(&self, key: K, value: V) -> Option<(K, V)> {
        self.write().push_back(key, value)
    }

    /// Removes and returns the oldest entry under the write lock.
    pub fn pop_front(&self) -> Option<(K, V)> {
        self.write().pop_front()
    }

    /// Removes the entry for `key` under the write lock, returning its value if present.
    pub fn erase<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.write().erase(key)
    }

    /// Removes all entries under the write lock.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns whether the map contains `key`, scanning oldest to newest.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.read().contains(key)
    }

    /// Returns whether the map contains `key`, scanning newest to oldest.
    #[must_use]
    pub fn rcontains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.read().rcontains(key)
    }

    /// Calls `visitor` for every entry, oldest to newest, while holding the read lock.
    ///
    /// The visitor must not access this map.
    pub fn traverse<F>(&self, visitor: F)
    where
        F: FnMut(&K, &V),
    {
        self.read().traverse(visitor);
    }

    /// Calls `visitor` for every entry, newest to oldest, while holding the read lock.
    ///
    /// The visitor must not access this map.
    pub fn rtraverse<F>(&self, visitor: F)
    where
        F: FnMut(&K, &V),
    {
        self.read().rtraverse(visitor);
    }

    fn read(&self) -> RwLockReadGuard<'_, RingMap<K, V>> {
        self.inner.read().unwrap_or_else(|e| {
            log::warn!("{RWLOCK_POISONED}: recovering read guard");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, RingMap<K, V>> {
        self.inner.write().unwrap_or_else(|e| {
            log::warn!("{RWLOCK_POISONED}: recovering write guard");
            e.into_inner()
        })
    }
}

impl<K, V> SharedRingMap<K, V>
where
    K: PartialEq,
    V: Clone,
{
    /// Returns a clone of the value for `key`, scanning oldest to newest.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.read().find(key).cloned()
    }

    /// Returns a clone of the first value (oldest to newest) matching `predicate`.
    ///
    /// The predicate runs under the read lock and must not access this map.
    pub fn find_if<F>(&self, predicate: F) -> Option<V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.read().find_if(predicate).cloned()
    }

    /// Returns a clone of the first value (newest to oldest) matching `predicate`.
    ///
    /// The predicate runs under the read lock and must not access this map.
    pub fn rfind_if<F>(&self, predicate: F) -> Option<V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.read().rfind_if(predicate).cloned()
    }
}

impl<K, V> SharedRingMap<K, V>
where
    K: PartialEq + Clone,
    V: Clone,
{
    /// Returns an owned copy of all entries, oldest to newest.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::{panic::AssertUnwindSafe, sync::Arc};

    use rstest::{fixture, rstest};

    use super::*;

    type TestMap = SharedRingMap<String, i32>;

    #[fixture]
    fn map_ab() -> TestMap {
        let map = TestMap::new(2);
        map.push_back("a".to_string(), 1);
        map.push_back("b".to_string(), 2);
        map
    }

    #[rstest]
    fn test_new() {
        let map = TestMap::new(2);
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[rstest]
    fn test_new_checked_zero_capacity() {
        assert!(TestMap::new_checked(0).is_err());
    }

    #[rstest]
    fn test_from_config() {
        let config = RingMapConfig::new(8, "Shared", false);
        let map = TestMap::from_config(&config).unwrap();
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.into_inner().name(), "Shared");
    }

    #[rstest]
    fn test_push_back_evicts_oldest(map_ab: TestMap) {
        assert!(map_ab.is_full());
        let evicted = map_ab.push_back("c".to_string(), 3);
        assert_eq!(evicted, Some(("a".to_string(), 1)));
        assert!(!map_ab.contains("a"));
        assert!(map_ab.contains("b"));
        assert!(map_ab.rcontains("c"));
    }

    #[rstest]
    fn test_find_returns_owned_value(map_ab: TestMap) {
        let found = map_ab.find("a");
        map_ab.clear();
        assert_eq!(found, Some(1));
        assert_eq!(map_ab.find("a"), None);
    }

    #[rstest]
    fn test_find_if_and_rfind_if(map_ab: TestMap) {
        assert_eq!(map_ab.find_if(|_, v| *v > 0), Some(1));
        assert_eq!(map_ab.rfind_if(|_, v| *v > 0), Some(2));
        assert_eq!(map_ab.find_if(|k, _| k == "z"), None);
    }

    #[rstest]
    fn test_pop_front(map_ab: TestMap) {
        assert_eq!(map_ab.pop_front(), Some(("a".to_string(), 1)));
        assert_eq!(map_ab.pop_front(), Some(("b".to_string(), 2)));
        assert_eq!(map_ab.pop_front(), None);
    }

    #[rstest]
    fn test_erase(map_ab: TestMap) {
        assert_eq!(map_ab.erase("z"), None);
        assert_eq!(map_ab.erase("a"), Some(1));
        assert_eq!(map_ab.len(), 1);
    }

    #[rstest]
    fn test_traverse_and_rtraverse(map_ab: TestMap) {
        let mut forward = Vec::new();
        map_ab.traverse(|k, _| forward.push(k.clone()));
        assert_eq!(forward, ["a", "b"]);

        let mut backward = Vec::new();
        map_ab.rtraverse(|k, _| backward.push(k.clone()));
        assert_eq!(backward, ["b", "a"]);
    }

    #[rstest]
    fn test_snapshot(map_ab: TestMap) {
        let snapshot = map_ab.snapshot();
        map_ab.push_back("c".to_string(), 3);
        assert_eq!(
            snapshot,
            [("a".to_string(), 1), ("b".to_string(), 2)]
        );
    }

    #[rstest]
    fn test_recovers_from_poisoned_lock(map_ab: TestMap) {
        let map = Arc::new(map_ab);
        let poisoner = Arc::clone(&map);

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = poisoner.inner.write().unwrap();
            panic!("writer panicked");
        }));
        assert!(result.is_err());
        assert!(map.inner.is_poisoned());

        assert_eq!(map.len(), 2);
        map.push_back("c".to_string(), 3);
        assert_eq!(map.snapshot().len(), 2);
        assert_eq!(map.find("c"), Some(3));
    }

    #[rstest]
    fn test_debug(map_ab: TestMap) {
        let debug = format!("{map_ab:?}");
        assert!(debug.starts_with("SharedRingMap"));
        assert!(debug.contains("\"a\""));
    }
}
