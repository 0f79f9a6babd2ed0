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

//! A fixed-capacity, insertion-ordered map with FIFO eviction.
//!
//! Entries are kept oldest (front) to newest (back). All lookups are linear scans over
//! the entries; there is no secondary index, so the map is intended for small capacities
//! where eviction must stay O(1).

use std::{borrow::Borrow, collections::VecDeque};

use circlemap_core::correctness::{FAILED, check_positive_usize};

use crate::config::RingMapConfig;

/// A bounded map that keeps entries in insertion order and evicts the oldest on overflow.
///
/// - Pushing a new key when full evicts exactly one entry, the oldest.
/// - Pushing an existing key replaces its value in place; order and length are unchanged.
/// - Reads never reorder entries.
///
/// # Thread Safety
///
/// This map is not thread-safe. For concurrent access use
/// [`SharedRingMap`](crate::cache::shared::SharedRingMap).
///
/// # Examples
///
/// ```
/// use circlemap_common::cache::ring::RingMap;
///
/// let mut map: RingMap<&str, i32> = RingMap::new(2);
/// map.push_back("a", 1);
/// map.push_back("b", 2);
/// map.push_back("c", 3);
///
/// assert!(!map.contains("a"));
/// assert_eq!(map.find("b"), Some(&2));
/// assert_eq!(map.pop_front(), Some(("b", 2)));
/// ```
///
/// Zero capacity is rejected:
///
/// ```
/// use circlemap_common::cache::ring::RingMap;
///
/// assert!(RingMap::<u32, u32>::new_checked(0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RingMap<K, V> {
    entries: VecDeque<(K, V)>,
    capacity: usize,
    name: String,
    log_evictions: bool,
}

impl<K, V> RingMap<K, V>
where
    K: PartialEq,
{
    /// Creates a new empty [`RingMap`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn new_checked(capacity: usize) -> anyhow::Result<Self> {
        check_positive_usize(capacity, "capacity")?;

        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            name: stringify!(RingMap).to_string(),
            log_evictions: false,
        })
    }

    /// Creates a new empty [`RingMap`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::new_checked(capacity).expect(FAILED)
    }

    /// Creates a new empty [`RingMap`] instance from the given `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn from_config(config: &RingMapConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let mut map = Self::new_checked(config.capacity)?;
        map.name.clone_from(&config.name);
        map.log_evictions = config.log_evictions;
        Ok(map)
    }

    /// Returns the name used in log records.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fixed capacity of the map.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether the next push of a new key will evict the oldest entry.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Pushes a key-value pair onto the back of the map.
    ///
    /// If the key already exists its value is replaced in place, without changing its
    /// position or the length. Otherwise, if the map is full, the oldest entry is evicted
    /// before the new entry is appended.
    ///
    /// Returns the evicted entry, if any.
    pub fn push_back(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            *existing = value;
            return None;
        }

        let evicted = if self.is_full() {
            self.entries.pop_front()
        } else {
            None
        };

        if evicted.is_some() {
            self.log_eviction();
        }

        self.entries.push_back((key, value));
        evicted
    }

    /// Removes and returns the oldest entry, or `None` if the map is empty.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.entries.pop_front()
    }

    /// Returns whether the map contains `key`, scanning oldest to newest.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries.iter().any(|(k, _)| k.borrow() == key)
    }

    /// Returns whether the map contains `key`, scanning newest to oldest.
    ///
    /// The result is always the same as [`RingMap::contains`]; prefer this when recently
    /// pushed keys are the likely hits.
    #[must_use]
    pub fn rcontains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries.iter().rev().any(|(k, _)| k.borrow() == key)
    }

    /// Returns a reference to the value for `key`, scanning oldest to newest.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns the value of the first entry (oldest to newest) matching `predicate`.
    pub fn find_if<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.entries
            .iter()
            .find(|(k, v)| predicate(k, v))
            .map(|(_, v)| v)
    }

    /// Returns the value of the first entry (newest to oldest) matching `predicate`.
    pub fn rfind_if<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.entries
            .iter()
            .rev()
            .find(|(k, v)| predicate(k, v))
            .map(|(_, v)| v)
    }

    /// Removes the entry for `key`, returning its value if it was present.
    ///
    /// The scan is always oldest to newest. The relative order of the remaining entries
    /// is unchanged.
    pub fn erase<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        if self.entries.is_empty() {
            return None;
        }

        let index = self.entries.iter().position(|(k, _)| k.borrow() == key)?;
        self.entries.remove(index).map(|(_, v)| v)
    }

    /// Calls `visitor` for every entry, oldest to newest.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in &self.entries {
            visitor(k, v);
        }
    }

    /// Calls `visitor` for every entry, newest to oldest.
    pub fn rtraverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.entries.iter().rev() {
            visitor(k, v);
        }
    }

    /// Returns the oldest entry without removing it.
    #[must_use]
    pub fn front(&self) -> Option<(&K, &V)> {
        self.entries.front().map(|(k, v)| (k, v))
    }

    /// Returns the newest entry without removing it.
    #[must_use]
    pub fn back(&self) -> Option<(&K, &V)> {
        self.entries.back().map(|(k, v)| (k, v))
    }

    /// Returns an iterator over the entries, oldest to newest.
    ///
    /// The iterator is double-ended; use `.rev()` for newest to oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Removes all entries from the map. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn log_eviction(&self) {
        if self.log_evictions {
            log::debug!(
                "{}: evicted oldest entry at capacity {}",
                self.name,
                self.capacity
            );
        } else {
            log::trace!(
                "{}: evicted oldest entry at capacity {}",
                self.name,
                self.capacity
            );
        }
    }
}
