//! Explicit cursor over a container.
//!
//! [`Cursor`] offers the classic `rewind` / `valid` / `current` / `key` /
//! `next` protocol. The position lives in the cursor, not in the container,
//! so any number of cursors and iterators can walk the same container at
//! once.
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let hash = Hash::from_pairs([("a", 1), ("b", 2)]);
//! let mut cursor = hash.cursor();
//! let mut seen = Vec::new();
//! cursor.rewind();
//! while cursor.valid() {
//!     seen.push(format!("{:?}={:?}", cursor.key(), cursor.current()));
//!     cursor.next();
//! }
//! assert_eq!(seen.len(), 2);
//! ```

use crate::entries::Entries;
use crate::key::Key;
use crate::observer::{self, Access};
use crate::value::Value;

/// A movable position over the pairs of a container.
pub struct Cursor<'a, H> {
    entries: &'a Entries<H>,
    position: usize,
}

impl<'a, H> Cursor<'a, H> {
    /// Creates a cursor on the first pair.
    #[must_use]
    pub const fn new(entries: &'a Entries<H>) -> Self {
        Self {
            entries,
            position: 0,
        }
    }

    /// Moves back to the first pair.
    pub fn rewind(&mut self) -> &mut Self {
        observer::notify(Access::Rewind);
        self.position = 0;
        self
    }

    /// Returns `true` while the cursor points at a pair.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.position < self.entries.len()
    }

    /// The value under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&'a Value<H>> {
        self.entries.get_index(self.position).map(|(_, value)| value)
    }

    /// The key under the cursor.
    #[must_use]
    pub fn key(&self) -> Option<&'a Key> {
        self.entries.get_index(self.position).map(|(key, _)| key)
    }

    /// Advances and returns the value now under the cursor.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a Value<H>> {
        if self.valid() {
            self.position += 1;
        }
        observer::notify(Access::Advance(self.key()));
        self.current()
    }
}
