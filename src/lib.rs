//! # koine
//!
//! An insertion-ordered hash container with Ruby-style combinators.
//!
//! ## Overview
//!
//! The central abstraction is the [`OrderedMap`] trait: a key-unique,
//! insertion-ordered container of heterogeneous [`Value`]s whose keys are
//! integers or strings ([`Key`]). A type implementing it only supplies its
//! storage; every accessor and combinator is provided, and every combinator
//! returns the receiver's own type.
//!
//! - **Containers**: [`Hash`], the ready-made [`OrderedMap`]
//! - **Values**: [`Value`], with nested containers shared by reference
//! - **Combinators**: select, reject, map, fold, `group_by`, `sort_by`, merge
//! - **Observation**: an opt-in [`observer`] hook on every access
//! - **Text**: a small string wrapper whose `split` returns a [`Hash`]
//!
//! ## Feature Flags
//!
//! - `text`: the [`Text`] wrapper (default)
//! - `tracing`: [`observer::TracingObserver`] (default)
//! - `serde`: `Serialize` / `Deserialize` for keys, values and hashes
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let person = |age: i64, team: i64| -> Value { Value::array([("age", age), ("team", team)]) };
//! let people = Hash::from_pairs([
//!     ("ana", person(31, 1)),
//!     ("bob", person(25, 2)),
//!     ("cid", person(28, 1)),
//! ]);
//!
//! let youngest_first = people.sort_by("age").unwrap();
//! let ages = youngest_first.map(|person, _| {
//!     person.as_hash().map_or(Value::Null, |person| person.borrow().get_or("age", Value::Null))
//! });
//! assert_eq!(ages.join(","), "25,28,31");
//!
//! let teams = people.group_by("team").unwrap();
//! assert_eq!(teams.keys(), Hash::from_list([1, 2]));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use koine::prelude::*;
/// ```
pub mod prelude {
    pub use crate::criteria::Criteria;
    pub use crate::error::HashError;
    pub use crate::hash::Hash;
    pub use crate::key::Key;
    pub use crate::ordered_map::{OrderedMap, Reducer};
    pub use crate::value::{Array, Value};

    #[cfg(feature = "text")]
    pub use crate::text::Text;
}

mod criteria;
mod cursor;
mod entries;
mod error;
mod hash;
mod key;
pub mod observer;
mod ordered_map;
mod value;

#[cfg(feature = "text")]
mod text;

pub use criteria::{Criteria, CriteriaFunction};
pub use cursor::Cursor;
pub use entries::{Entries, Iter};
pub use error::HashError;
pub use hash::Hash;
pub use key::Key;
pub use ordered_map::{OrderedMap, Reducer};
pub use value::{Array, Object, Shared, Value, array, list};

#[cfg(feature = "text")]
pub use text::{Text, TextError};
