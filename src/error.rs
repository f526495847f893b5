//! Error types for container operations.
//!
//! Lookups fail only in [`fetch`](crate::OrderedMap::fetch) on an absent
//! key without a fallback. [`inject`](crate::OrderedMap::inject) fails
//! without a reducer, criteria-based combinators fail on unusable criteria,
//! and [`try_push`](crate::OrderedMap::try_push) fails once no append index
//! is left. Every other lookup is lenient and answers with a default
//! instead.

use thiserror::Error;

use crate::key::Key;

/// Errors raised by container operations.
///
/// # Examples
///
/// ```rust
/// use koine::{HashError, Key};
///
/// let error = HashError::InvalidKey { key: Key::from("bar") };
/// assert_eq!(error.to_string(), "Invalid key 'bar'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// A strict lookup found no such key and no fallback was given.
    #[error("Invalid key '{key}'")]
    InvalidKey {
        /// The missing key.
        key: Key,
    },
    /// An operation received arguments it cannot work with.
    #[error("{message}")]
    InvalidArgument {
        /// What was wrong with the arguments.
        message: String,
    },
}

impl HashError {
    /// Creates an [`HashError::InvalidKey`].
    #[must_use]
    pub fn invalid_key(key: impl Into<Key>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Creates an [`HashError::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
