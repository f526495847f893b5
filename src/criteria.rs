//! Criteria for grouping and sorting.
//!
//! A [`Criteria`] derives a grouping or sorting value from each element. It
//! is either a function of `(value, key)` or the name of a key to
//! [`fetch`](crate::OrderedMap::fetch) from each element, which then has to
//! be a nested container.
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let by_name: Criteria<'_> = "name".into();
//! let by_length: Criteria<'_> = Criteria::by_function(|value: &Value, _: &Key| {
//!     Value::Int(value.to_string().len() as i64)
//! });
//! assert!(matches!(by_name, Criteria::ByKey(_)));
//! assert!(matches!(by_length, Criteria::ByFunction(_)));
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::error::HashError;
use crate::hash::Hash;
use crate::key::Key;
use crate::ordered_map::OrderedMap;
use crate::value::Value;

/// A function deriving a criteria value from an element and its key.
pub type CriteriaFunction<'a, H> = Box<dyn Fn(&Value<H>, &Key) -> Value<H> + 'a>;

/// How to derive a grouping or sorting value from an element.
pub enum Criteria<'a, H = Hash> {
    /// Fetch this key from every element.
    ByKey(Key),
    /// Call this function with every element and its key.
    ByFunction(CriteriaFunction<'a, H>),
}

impl<'a, H> Criteria<'a, H> {
    /// Criteria that fetches `key` from every element.
    #[must_use]
    pub fn by_key(key: impl Into<Key>) -> Self {
        Self::ByKey(key.into())
    }

    /// Criteria computed by `function`.
    #[must_use]
    pub fn by_function<F>(function: F) -> Self
    where
        F: Fn(&Value<H>, &Key) -> Value<H> + 'a,
    {
        Self::ByFunction(Box::new(function))
    }
}

impl<H: OrderedMap> Criteria<'_, H> {
    /// Computes the criteria value of one element.
    ///
    /// # Errors
    ///
    /// With [`Criteria::ByKey`], fails with [`HashError::InvalidArgument`]
    /// when the element is not a container, and with
    /// [`HashError::InvalidKey`] when the container lacks the key.
    pub fn evaluate(&self, element: &Value<H>, key: &Key) -> Result<Value<H>, HashError> {
        match self {
            Self::ByFunction(function) => Ok(function(element, key)),
            Self::ByKey(name) => match element {
                Value::Hash(shared) => shared.borrow().fetch(name),
                other => Err(HashError::invalid_argument(format!(
                    "cannot fetch '{name}' from the {} at key '{key}'",
                    other.type_name()
                ))),
            },
        }
    }
}

impl<H> From<Key> for Criteria<'_, H> {
    #[inline]
    fn from(key: Key) -> Self {
        Self::ByKey(key)
    }
}

impl<H> From<&str> for Criteria<'_, H> {
    #[inline]
    fn from(key: &str) -> Self {
        Self::ByKey(Key::from(key))
    }
}

impl<H> From<String> for Criteria<'_, H> {
    #[inline]
    fn from(key: String) -> Self {
        Self::ByKey(Key::from(key))
    }
}

impl<H> fmt::Debug for Criteria<'_, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByKey(key) => formatter.debug_tuple("ByKey").field(key).finish(),
            Self::ByFunction(_) => formatter.write_str("ByFunction(..)"),
        }
    }
}

// =============================================================================
// Evaluation and Buckets
// =============================================================================

/// Evaluates `criteria` once per element of `container`, pairing each
/// criteria value with its element in encounter order.
pub(crate) fn evaluate_all<H: OrderedMap>(
    container: &H,
    criteria: &Criteria<'_, H>,
) -> Result<Vec<(Value<H>, Value<H>)>, HashError> {
    container
        .iter()
        .map(|(key, element)| Ok((criteria.evaluate(element, key)?, element.clone())))
        .collect()
}

/// Groups the elements of `container` by criteria value converted to a
/// key, groups in first-seen order and elements in encounter order.
///
/// Fails with [`HashError::InvalidArgument`] for a criteria value that
/// cannot be a key.
pub(crate) fn bucket<H: OrderedMap>(
    container: &H,
    criteria: &Criteria<'_, H>,
) -> Result<IndexMap<Key, Vec<Value<H>>>, HashError> {
    let mut groups: IndexMap<Key, Vec<Value<H>>> = IndexMap::new();
    for (value, element) in evaluate_all(container, criteria)? {
        groups.entry(value.to_key()?).or_default().push(element);
    }
    Ok(groups)
}
