//! The base container type.
//!
//! [`Hash`] is the ready-made [`OrderedMap`]: an insertion-ordered,
//! key-unique container of heterogeneous [`Value`]s. Nested arrays given at
//! construction become nested `Hash`es.
//!
//! # Examples
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let user: Value = Value::array([("name", "ada"), ("lang", "en")]);
//! let mut hash = Hash::new(vec![(Key::from("user"), user)], true);
//!
//! hash.set("active", true).push("appended");
//!
//! assert_eq!(hash.count(), 3);
//! assert_eq!(hash.get(0), Some(&Value::from("appended")));
//! assert!(matches!(hash.get("user"), Some(Value::Hash(_))));
//!
//! let names = hash.keys().join(", ");
//! assert_eq!(names, "user, active, 0");
//! ```
//!
//! # Copies and sharing
//!
//! `Clone` copies the top-level pairs only. Nested containers are shared
//! between the original and the copy.

use std::fmt;

use crate::entries::{Entries, Iter};
use crate::key::Key;
use crate::ordered_map::OrderedMap;
use crate::value::{Array, Value};

/// An insertion-ordered container of heterogeneous values.
#[derive(Clone, Default, PartialEq)]
pub struct Hash {
    entries: Entries<Hash>,
}

impl Hash {
    /// Creates a hash from a plain array.
    ///
    /// With `recursive`, nested arrays at any depth become nested hashes;
    /// otherwise they are stored as plain arrays.
    #[must_use]
    pub fn new(values: Array, recursive: bool) -> Self {
        Self::create(values, recursive)
    }
}

impl OrderedMap for Hash {
    #[inline]
    fn from_entries(entries: Entries<Self>) -> Self {
        Self { entries }
    }

    #[inline]
    fn entries(&self) -> &Entries<Self> {
        &self.entries
    }

    #[inline]
    fn entries_mut(&mut self) -> &mut Entries<Self> {
        &mut self.entries
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl fmt::Debug for Hash {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries.iter()).finish()
    }
}

impl FromIterator<(Key, Value)> for Hash {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Self::create(iter.into_iter().collect(), true)
    }
}

impl Extend<(Key, Value)> for Hash {
    fn extend<I: IntoIterator<Item = (Key, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a Hash {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a, Hash>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Hash> for Value {
    #[inline]
    fn from(hash: Hash) -> Self {
        Self::shared(hash)
    }
}

// =============================================================================
// Serde
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        crate::value::serialize_pairs(serializer, self.entries.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match <Value as serde::Deserialize>::deserialize(deserializer)? {
            Value::Array(pairs) => Ok(Self::create(pairs, true)),
            other => Err(serde::de::Error::custom(format!(
                "expected a map or a sequence, found a {} value",
                other.type_name()
            ))),
        }
    }
}
