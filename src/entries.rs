//! Primitive insertion-ordered storage behind every container.
//!
//! [`Entries`] keeps key/value pairs in insertion order and tracks the next
//! append index. Overwriting a key keeps its position; removing a key shifts
//! the later pairs down without disturbing their order.
//!
//! The append index is one past the largest integer key ever inserted,
//! starting at zero. Removing keys never lowers it, and negative keys never
//! raise it. Once `i64::MAX` has been used as a key there is no next index
//! and appending is refused.

use std::fmt;

use indexmap::IndexMap;

use crate::key::Key;
use crate::ordered_map::OrderedMap;
use crate::value::{Array, Value};

/// Insertion-ordered key/value storage.
#[derive(Clone)]
pub struct Entries<H> {
    map: IndexMap<Key, Value<H>>,
    next_index: Option<i64>,
}

impl<H> Entries<H> {
    /// Creates empty storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
            next_index: Some(0),
        }
    }

    /// Creates empty storage with room for `capacity` pairs.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(capacity),
            next_index: Some(0),
        }
    }

    /// Returns the number of pairs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when there are no pairs.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The index the next appended value will receive, or `None` once the
    /// integer keys are exhausted.
    #[inline]
    #[must_use]
    pub const fn next_index(&self) -> Option<i64> {
        self.next_index
    }

    /// Looks up a value.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value<H>> {
        self.map.get(key)
    }

    /// Returns `true` if the key is present.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the pair at `position` in insertion order.
    #[inline]
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<(&Key, &Value<H>)> {
        self.map.get_index(position)
    }

    /// Inserts or overwrites a value, returning the previous one.
    ///
    /// An overwritten key keeps its position.
    pub fn insert(&mut self, key: Key, value: Value<H>) -> Option<Value<H>> {
        if let (Key::Index(index), Some(next)) = (&key, self.next_index) {
            if *index >= next {
                self.next_index = index.checked_add(1);
            }
        }
        self.map.insert(key, value)
    }

    /// Appends a value at the next integer index and returns that index.
    ///
    /// Returns `None` without storing anything when no index is left.
    pub fn push(&mut self, value: Value<H>) -> Option<Key> {
        let key = Key::Index(self.next_index?);
        self.insert(key.clone(), value);
        Some(key)
    }

    /// Removes a key, keeping the order of the remaining pairs.
    pub fn remove(&mut self, key: &Key) -> Option<Value<H>> {
        self.map.shift_remove(key)
    }

    /// Iterates over the pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, H> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// Iterates over the keys in insertion order.
    #[inline]
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value<H>> {
        self.map.keys()
    }
}

impl<H: Clone> Entries<H> {
    /// Copies the pairs into a plain array without touching nested values.
    #[must_use]
    pub fn to_array(&self) -> Array<H> {
        self.map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the pairs of a container, in insertion order.
///
/// Every call to [`OrderedMap::iter`] produces a fresh iterator, so nested
/// traversals of the same container never interfere.
pub struct Iter<'a, H> {
    inner: indexmap::map::Iter<'a, Key, Value<H>>,
}

impl<'a, H> Iterator for Iter<'a, H> {
    type Item = (&'a Key, &'a Value<H>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<H> DoubleEndedIterator for Iter<'_, H> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<H> ExactSizeIterator for Iter<'_, H> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<H> Clone for Iter<'_, H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<H> Default for Entries<H> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, H> IntoIterator for &'a Entries<H> {
    type Item = (&'a Key, &'a Value<H>);
    type IntoIter = Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Order-sensitive: two storages are equal when they hold equal pairs in
/// the same order. The append index is not compared.
impl<H: OrderedMap> PartialEq for Entries<H> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((left_key, left_value), (right_key, right_value))| {
                    left_key == right_key && left_value == right_value
                })
    }
}

impl<H: fmt::Debug> fmt::Debug for Entries<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.map.iter()).finish()
    }
}
