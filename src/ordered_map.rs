//! The `OrderedMap` trait: an insertion-ordered container with combinators.
//!
//! This module provides [`OrderedMap`], the trait every container type
//! implements. A type only supplies its storage ([`Entries`]) and a way to be
//! built from storage; construction, accessors, iteration and the whole
//! combinator library are provided on top of that.
//!
//! Because every combinator builds its result through
//! [`OrderedMap::from_entries`] of the receiver's own type, a custom
//! container gets a closed algebra for free: `select`, `map`, `group_by`,
//! `merge` and friends on a `MyHash` all return `MyHash`.
//!
//! # Examples
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let prices = Hash::from_pairs([("apple", 3), ("pear", 5), ("plum", 2)]);
//!
//! let cheap = prices.select(|price, _| price.as_int().is_some_and(|price| price < 4));
//! assert_eq!(cheap.keys(), Hash::from_list(["apple", "plum"]));
//!
//! let total = prices.fold(0, |total, price, _| total + price.as_int().unwrap_or(0));
//! assert_eq!(total, 10);
//! ```
//!
//! # Strict and lenient lookups
//!
//! [`OrderedMap::fetch`] is the only strict accessor: it fails with
//! [`HashError::InvalidKey`] for an absent key unless a fallback is given.
//! [`OrderedMap::get`], [`OrderedMap::delete`] and
//! [`OrderedMap::values_at`] answer absent keys with `None` or
//! [`Value::Null`].

use std::fmt;

use crate::criteria::{self, Criteria};
use crate::cursor::Cursor;
use crate::entries::{Entries, Iter};
use crate::error::HashError;
use crate::key::Key;
use crate::observer::{self, Access};
use crate::value::{self, Array, Value};

/// A boxed fold function for [`OrderedMap::inject`].
///
/// Receives the accumulator, the value and the key, and returns the next
/// accumulator.
pub type Reducer<'a, H> = Box<dyn FnMut(Value<H>, &Value<H>, &Key) -> Value<H> + 'a>;

/// An insertion-ordered, key-unique container of heterogeneous values.
///
/// # Required Methods
///
/// - `from_entries`: build a container of this type from storage (the
///   factory every combinator goes through)
/// - `entries` / `entries_mut`: access the storage
///
/// # Provided Methods
///
/// - Construction: `create`, `create_empty`, `from_pairs`, `from_list`
/// - Accessors: `get`, `get_or`, `set`, `push`, `try_push`, `has_key`, `exists`,
///   `unset`, `delete`, `fetch`, `fetch_or`, `fetch_or_else`
/// - Traversal: `iter`, `cursor`, `each`
/// - Queries: `count`, `is_empty`, `keys`, `has_value`, `values_at`, `join`,
///   `first`, `last`
/// - Combinators: `select`, `reject`, `compact`, `map`, `fold`, `inject`,
///   `group_by`, `sort_by`
/// - Merging: `merge`, `merge_with`, `deep_merge`
/// - Conversion: `to_array`, `clear`
///
/// `unset` is the single deletion primitive; `delete` and `clear` go
/// through it, so overriding it is enough to observe every removal.
///
/// None of the combinators mutate the receiver. Results share nested
/// containers with the receiver, except where `deep_merge` recurses.
pub trait OrderedMap: Sized + Clone + fmt::Debug {
    /// Builds a container of this type around `entries`.
    fn from_entries(entries: Entries<Self>) -> Self;

    /// The underlying storage.
    fn entries(&self) -> &Entries<Self>;

    /// The underlying storage, mutably.
    fn entries_mut(&mut self) -> &mut Entries<Self>;

    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a container of this type from a plain array.
    ///
    /// With `recursive`, every [`Value::Array`] (at any depth) becomes a
    /// nested container of this same type. Without it, arrays are stored
    /// untouched. Duplicate keys keep the position of their first
    /// occurrence and the value of their last.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let nested: Value = Value::array([("x", 1)]);
    ///
    /// let deep = Hash::create(vec![(Key::from("a"), nested.clone())], true);
    /// assert!(matches!(deep.get("a"), Some(Value::Hash(_))));
    ///
    /// let shallow = Hash::create(vec![(Key::from("a"), nested)], false);
    /// assert!(matches!(shallow.get("a"), Some(Value::Array(_))));
    /// ```
    fn create(values: Array<Self>, recursive: bool) -> Self {
        let mut entries = Entries::with_capacity(values.len());
        for (key, value) in values {
            let value = match value {
                Value::Array(nested) if recursive => {
                    Value::shared(Self::create(nested, recursive))
                }
                other => other,
            };
            entries.insert(key, value);
        }
        Self::from_entries(entries)
    }

    /// Creates an empty container of this type.
    #[must_use]
    fn create_empty() -> Self {
        Self::from_entries(Entries::new())
    }

    /// Creates a container from key/value pairs, converting nested arrays.
    fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value<Self>>,
    {
        Self::create(value::array(pairs), true)
    }

    /// Creates a container with sequential indices, converting nested
    /// arrays.
    fn from_list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value<Self>>,
    {
        Self::create(value::list(values), true)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Looks up a value. Absent keys give `None`.
    fn get(&self, key: impl Into<Key>) -> Option<&Value<Self>> {
        let key = key.into();
        observer::notify(Access::Get(&key));
        self.entries().get(&key)
    }

    /// Looks up a value, falling back to `default` for absent keys.
    fn get_or(&self, key: impl Into<Key>, default: Value<Self>) -> Value<Self> {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Inserts or overwrites a value. An overwritten key keeps its position.
    fn set(&mut self, key: impl Into<Key>, value: impl Into<Value<Self>>) -> &mut Self {
        let key = key.into();
        observer::notify(Access::Set(Some(&key)));
        self.entries_mut().insert(key, value.into());
        self
    }

    /// Appends a value at the next integer index.
    ///
    /// Once `i64::MAX` has been used as a key no next index exists. The
    /// value is then dropped and no stored pair is touched;
    /// [`OrderedMap::try_push`] reports that case instead.
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let mut hash = Hash::from_pairs([(5, "five")]);
    /// hash.push("six").push("seven");
    /// assert_eq!(hash.get(6), Some(&Value::from("six")));
    /// assert_eq!(hash.get(7), Some(&Value::from("seven")));
    /// ```
    fn push(&mut self, value: impl Into<Value<Self>>) -> &mut Self {
        let _ = self.try_push(value);
        self
    }

    /// Appends a value at the next integer index, failing when none is
    /// left.
    ///
    /// # Errors
    ///
    /// Fails with [`HashError::InvalidArgument`] once `i64::MAX` has been
    /// used as a key. The container is left unchanged.
    fn try_push(&mut self, value: impl Into<Value<Self>>) -> Result<&mut Self, HashError> {
        observer::notify(Access::Set(None));
        match self.entries_mut().push(value.into()) {
            Some(_) => Ok(self),
            None => Err(HashError::invalid_argument(
                "cannot append: the next integer index is already taken",
            )),
        }
    }

    /// Returns `true` if the key is present, whatever its value.
    fn has_key(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        observer::notify(Access::Exists(&key));
        self.entries().contains_key(&key)
    }

    /// Returns `true` if the key is present and its value is not null.
    fn exists(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        observer::notify(Access::Exists(&key));
        self.entries().get(&key).is_some_and(|value| !value.is_null())
    }

    /// Removes a key and returns its value.
    ///
    /// This is the deletion primitive: [`OrderedMap::delete`] and
    /// [`OrderedMap::clear`] remove every key through it.
    fn unset(&mut self, key: &Key) -> Option<Value<Self>> {
        observer::notify(Access::Unset(key));
        self.entries_mut().remove(key)
    }

    /// Removes a key and returns its value; absent keys give `None`.
    fn delete(&mut self, key: impl Into<Key>) -> Option<Value<Self>> {
        let key = key.into();
        self.unset(&key)
    }

    /// Strict lookup.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidKey`] when the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let hash = Hash::from_pairs([("foo", "bar")]);
    /// assert_eq!(hash.fetch("foo"), Ok(Value::from("bar")));
    /// assert_eq!(
    ///     hash.fetch("bar").unwrap_err().to_string(),
    ///     "Invalid key 'bar'"
    /// );
    /// ```
    fn fetch(&self, key: impl Into<Key>) -> Result<Value<Self>, HashError> {
        let key = key.into();
        match self.get(&key) {
            Some(value) => Ok(value.clone()),
            None => Err(HashError::InvalidKey { key }),
        }
    }

    /// Lookup with a fallback value for absent keys.
    fn fetch_or(&self, key: impl Into<Key>, default: Value<Self>) -> Value<Self> {
        self.get_or(key, default)
    }

    /// Lookup that computes a fallback from the absent key.
    fn fetch_or_else<F>(&self, key: impl Into<Key>, fallback: F) -> Value<Self>
    where
        F: FnOnce(&Key) -> Value<Self>,
    {
        let key = key.into();
        match self.get(&key) {
            Some(value) => value.clone(),
            None => fallback(&key),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Iterates over the pairs in insertion order.
    ///
    /// Each call starts a fresh traversal.
    fn iter(&self) -> Iter<'_, Self> {
        self.entries().iter()
    }

    /// Returns a cursor positioned on the first pair.
    fn cursor(&self) -> Cursor<'_, Self> {
        Cursor::new(self.entries())
    }

    /// Calls `action` with every value and key, in order, and returns the
    /// receiver for chaining.
    fn each<F>(&self, mut action: F) -> &Self
    where
        F: FnMut(&Value<Self>, &Key),
    {
        for (key, value) in self.iter() {
            action(value, key);
        }
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The number of top-level pairs.
    fn count(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` when there are no pairs.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The keys, as values of a new sequentially indexed container.
    fn keys(&self) -> Self {
        let mut keys = Self::create_empty();
        for key in self.entries().keys() {
            keys.push(key.clone());
        }
        keys
    }

    /// Returns `true` if a top-level value is [identical](Value::identical)
    /// to `value`. Nested containers are not searched.
    fn has_value(&self, value: &Value<Self>) -> bool {
        self.iter().any(|(_, candidate)| candidate.identical(value))
    }

    /// The values at `keys`, in the order given, with [`Value::Null`] for
    /// absent keys.
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let hash = Hash::from_pairs([("a", "b"), ("c", "b")]);
    /// let values = hash.values_at(["a", "zzz"]);
    /// assert_eq!(values, Hash::from_list([Value::from("b"), Value::Null]));
    /// ```
    fn values_at<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let mut values = Self::create_empty();
        for key in keys {
            values.push(self.get_or(key, Value::Null));
        }
        values
    }

    /// Stringifies every top-level value and joins them with `separator`.
    fn join(&self, separator: &str) -> String {
        self.iter()
            .map(|(_, value)| value.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// The first value by position.
    fn first(&self) -> Option<&Value<Self>> {
        self.entries().get_index(0).map(|(_, value)| value)
    }

    /// The last value by position.
    fn last(&self) -> Option<&Value<Self>> {
        self.entries()
            .len()
            .checked_sub(1)
            .and_then(|position| self.entries().get_index(position))
            .map(|(_, value)| value)
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// Keeps the pairs for which `predicate(value, key)` holds, with their
    /// keys and relative order.
    fn select<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Value<Self>, &Key) -> bool,
    {
        let mut selected = Self::create_empty();
        for (key, value) in self.iter() {
            if predicate(value, key) {
                selected.set(key.clone(), value.clone());
            }
        }
        selected
    }

    /// Drops the pairs for which `predicate(value, key)` holds.
    fn reject<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Value<Self>, &Key) -> bool,
    {
        self.select(|value, key| !predicate(value, key))
    }

    /// Drops values that are null or the empty string. Zero, `false` and
    /// empty containers stay.
    fn compact(&self) -> Self {
        self.reject(|value, _| value.is_null() || value.as_str() == Some(""))
    }

    /// Transforms every pair into a value of a new, sequentially indexed
    /// container. The original keys are discarded.
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let hash = Hash::from_pairs([("a", "b"), ("c", "d")]);
    /// let mapped = hash.map(|value, key| Value::from(format!("{key}{value}")));
    /// assert_eq!(mapped, Hash::from_list(["ab", "cd"]));
    /// ```
    fn map<F>(&self, mut transform: F) -> Self
    where
        F: FnMut(&Value<Self>, &Key) -> Value<Self>,
    {
        let mut mapped = Self::create_empty();
        for (key, value) in self.iter() {
            mapped.push(transform(value, key));
        }
        mapped
    }

    /// Left fold over the pairs in insertion order.
    fn fold<B, F>(&self, init: B, mut reducer: F) -> B
    where
        F: FnMut(B, &Value<Self>, &Key) -> B,
    {
        self.iter()
            .fold(init, |accumulator, (key, value)| reducer(accumulator, value, key))
    }

    /// Left fold with optional arguments.
    ///
    /// A missing `memo` starts the fold from [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidArgument`] when no reducer is given.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let hash = Hash::from_list([1, 2, 3]);
    /// let sum = hash.inject(
    ///     Some(Value::Int(10)),
    ///     Some(Box::new(|memo: Value, value: &Value, _: &Key| {
    ///         Value::Int(memo.as_int().unwrap_or(0) + value.as_int().unwrap_or(0))
    ///     })),
    /// );
    /// assert_eq!(sum, Ok(Value::Int(16)));
    ///
    /// assert!(hash.inject(None, None).is_err());
    /// ```
    fn inject(
        &self,
        memo: Option<Value<Self>>,
        reducer: Option<Reducer<'_, Self>>,
    ) -> Result<Value<Self>, HashError> {
        let Some(mut reducer) = reducer else {
            return Err(HashError::invalid_argument("No callback was given"));
        };
        Ok(self.fold(memo.unwrap_or_default(), |accumulator, value, key| {
            reducer(accumulator, value, key)
        }))
    }

    /// Groups values by criteria.
    ///
    /// The result is keyed by criteria value in first-seen order. Each
    /// group is a plain [`Value::Array`] list of the original values, in
    /// encounter order.
    ///
    /// # Errors
    ///
    /// Fails when a key-name criteria meets an element that is not a
    /// container or lacks the key, or when a criteria value cannot be used
    /// as a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let words = Hash::from_list(["ax", "bx", "ay"]);
    /// let groups = words
    ///     .group_by(Criteria::by_function(|word: &Value, _: &Key| {
    ///         Value::from(word.to_string().split_off(1))
    ///     }))
    ///     .unwrap();
    ///
    /// let expected: Hash = Hash::create(
    ///     vec![
    ///         (Key::from("x"), Value::list(["ax", "bx"])),
    ///         (Key::from("y"), Value::list(["ay"])),
    ///     ],
    ///     false,
    /// );
    /// assert_eq!(groups, expected);
    /// ```
    fn group_by<'c>(&self, criteria: impl Into<Criteria<'c, Self>>) -> Result<Self, HashError> {
        let groups = criteria::bucket(self, &criteria.into())?;
        let mut grouped = Self::create_empty();
        for (key, elements) in groups {
            grouped.set(key, Value::list(elements));
        }
        Ok(grouped)
    }

    /// Sorts values by criteria into a new, sequentially indexed container.
    ///
    /// Criteria values are compared with [`Value::natural_cmp`] as they
    /// are, never converted to keys, so `2.2` and `2.7` stay distinct and
    /// any value (including floats like `INF` and nested containers) is
    /// accepted. The sort is stable: elements with equal criteria keep
    /// their relative order. Containers and objects tie with each other.
    ///
    /// # Errors
    ///
    /// Fails when a key-name criteria meets an element that is not a
    /// container or lacks the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let sorted = Hash::from_list([2.7, 2.2, 2.5])
    ///     .sort_by(Criteria::by_function(|value: &Value, _: &Key| value.clone()))
    ///     .unwrap();
    /// assert_eq!(sorted.join(" "), "2.2 2.5 2.7");
    /// ```
    fn sort_by<'c>(&self, criteria: impl Into<Criteria<'c, Self>>) -> Result<Self, HashError> {
        let mut evaluated = criteria::evaluate_all(self, &criteria.into())?;
        evaluated.sort_by(|(left, _), (right, _)| left.natural_cmp(right));

        let mut sorted = Self::create_empty();
        for (_, element) in evaluated {
            sorted.push(element);
        }
        Ok(sorted)
    }

    // =========================================================================
    // Merging
    // =========================================================================

    /// Returns a copy of the receiver with every pair of `other` written on
    /// top of it.
    ///
    /// Nested containers are not merged: an incoming container replaces
    /// whatever was there.
    fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.set(key.clone(), value.clone());
        }
        merged
    }

    /// Like [`OrderedMap::merge`], but keys present on both sides take
    /// `resolver(key, old, new)`.
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let stock = Hash::from_pairs([("apple", 3), ("pear", 1)]);
    /// let delivery = Hash::from_pairs([("apple", 2), ("plum", 4)]);
    /// let merged = stock.merge_with(&delivery, |_, old, new| {
    ///     Value::Int(old.as_int().unwrap_or(0) + new.as_int().unwrap_or(0))
    /// });
    /// assert_eq!(merged, Hash::from_pairs([("apple", 5), ("pear", 1), ("plum", 4)]));
    /// ```
    fn merge_with<F>(&self, other: &Self, mut resolver: F) -> Self
    where
        F: FnMut(&Key, &Value<Self>, &Value<Self>) -> Value<Self>,
    {
        let mut merged = self.clone();
        for (key, incoming) in other.iter() {
            let value = match self.entries().get(key) {
                Some(existing) => resolver(key, existing, incoming),
                None => incoming.clone(),
            };
            merged.set(key.clone(), value);
        }
        merged
    }

    /// Like [`OrderedMap::merge`], but when both sides hold a container
    /// under the same key the two are merged recursively into a new
    /// container. Any other collision takes the value from `other`.
    ///
    /// The receiver and its nested containers are left untouched.
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let x: Value = Value::array([("x", 1)]);
    /// let y: Value = Value::array([("y", 2)]);
    /// let both: Value = Value::array([("x", 1), ("y", 2)]);
    ///
    /// let left = Hash::from_pairs([("a", x)]);
    /// let right = Hash::from_pairs([("a", y)]);
    ///
    /// let deep = left.deep_merge(&right);
    /// assert_eq!(deep, Hash::from_pairs([("a", both)]));
    ///
    /// let shallow = left.merge(&right);
    /// assert_eq!(shallow, right);
    /// ```
    fn deep_merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, incoming) in other.iter() {
            let value = match (merged.entries().get(key), incoming) {
                (Some(Value::Hash(existing)), Value::Hash(nested)) => {
                    Value::shared(existing.borrow().deep_merge(&nested.borrow()))
                }
                _ => incoming.clone(),
            };
            merged.set(key.clone(), value);
        }
        merged
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Converts to a plain array.
    ///
    /// With `recursive`, nested containers (also inside plain arrays) become
    /// plain arrays too; otherwise they stay shared handles.
    fn to_array(&self, recursive: bool) -> Array<Self> {
        if recursive {
            self.iter()
                .map(|(key, value)| (key.clone(), value.flatten()))
                .collect()
        } else {
            self.entries().to_array()
        }
    }

    /// Removes every key, one at a time, through [`OrderedMap::unset`].
    fn clear(&mut self) -> &mut Self {
        let keys: Vec<Key> = self.entries().keys().cloned().collect();
        for key in keys {
            self.delete(key);
        }
        self
    }
}
