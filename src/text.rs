//! A small string wrapper.
//!
//! [`Text`] offers a handful of Ruby-flavoured string helpers. It only
//! depends on the container for [`Text::split`], which returns a [`Hash`]
//! of `Text` segments.
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let text = Text::new("Hello Big World");
//! assert_eq!(text.parameterize("-").unwrap().as_str(), "hello-big-world");
//!
//! let words = text.split(" ");
//! assert_eq!(words.count(), 3);
//! assert_eq!(words.join("|"), "Hello|Big|World");
//! ```

use std::fmt;

use regex::Regex;
use thiserror::Error;

use crate::hash::Hash;
use crate::ordered_map::OrderedMap;
use crate::value::Value;

/// Errors raised by [`Text`] operations.
#[derive(Debug, Error)]
pub enum TextError {
    /// A `/.../` pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Why it did not compile.
        #[source]
        source: regex::Error,
    },
}

/// A wrapped string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    content: String,
}

impl Text {
    /// Wraps a string.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The wrapped string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Appends text in place.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self
    }

    /// Upper-cased copy (Unicode aware).
    #[must_use]
    pub fn to_upper_case(&self) -> Self {
        Self::new(self.content.to_uppercase())
    }

    /// Lower-cased copy (Unicode aware).
    #[must_use]
    pub fn to_lower_case(&self) -> Self {
        Self::new(self.content.to_lowercase())
    }

    /// Turns the text into a URL-friendly slug: lower-cased, whitespace
    /// runs replaced by `separator`, anything other than `separator` and
    /// `a-z` removed.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidPattern`] if the separator cannot be
    /// embedded in a pattern.
    pub fn parameterize(&self, separator: &str) -> Result<Self, TextError> {
        let escaped = regex::escape(separator);
        self.to_lower_case()
            .gsub(r"/\s+/", separator)?
            .gsub(&format!("/[^{escaped}a-z]/"), "")
    }

    /// Replaces every occurrence of `pattern`.
    ///
    /// A pattern written as `/expression/flags` is a regular expression
    /// (flags `i`, `m`, `s`, `x`, `u` are honoured); anything else is
    /// replaced literally. Regular expression replacements may refer to
    /// groups as `$1`.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidPattern`] for a `/.../` pattern that
    /// does not compile.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use koine::Text;
    ///
    /// let text = Text::new("a-b-c");
    /// assert_eq!(text.gsub("-", "+").unwrap().as_str(), "a+b+c");
    /// assert_eq!(text.gsub("/[ab]/", "x").unwrap().as_str(), "x-x-c");
    /// assert_eq!(text.gsub("/B/i", "_").unwrap().as_str(), "a-_-c");
    /// ```
    pub fn gsub(&self, pattern: &str, replacement: &str) -> Result<Self, TextError> {
        match regular_expression(pattern) {
            Some(expression) => {
                let compiled = Regex::new(&expression).map_err(|source| {
                    TextError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })?;
                Ok(Self::new(
                    compiled.replace_all(&self.content, replacement).into_owned(),
                ))
            }
            None => Ok(Self::new(self.content.replace(pattern, replacement))),
        }
    }

    /// Splits on `separator` into a sequentially indexed [`Hash`] of
    /// [`Text`] objects.
    ///
    /// An empty separator yields the whole text as the only segment.
    #[must_use]
    pub fn split(&self, separator: &str) -> Hash {
        let segments: Vec<&str> = if separator.is_empty() {
            vec![self.content.as_str()]
        } else {
            self.content.split(separator).collect()
        };
        Hash::from_list(segments).map(|segment, _| Value::object(Self::new(segment.to_string())))
    }

    /// The number of characters.
    #[must_use]
    pub fn count(&self) -> usize {
        self.content.chars().count()
    }

    /// The number of characters.
    #[must_use]
    pub fn length(&self) -> usize {
        self.count()
    }
}

/// Extracts the expression of a `/expression/flags` pattern, with the flags
/// folded in as an inline group.
fn regular_expression(pattern: &str) -> Option<String> {
    let body = pattern.strip_prefix('/')?;
    let closing = body.rfind('/')?;
    let (expression, flags) = (&body[..closing], &body[closing + 1..]);
    if !flags.chars().all(|flag| "imsxu".contains(flag)) {
        return None;
    }
    let flags: String = flags.chars().filter(|flag| *flag != 'u').collect();
    if flags.is_empty() {
        Some(expression.to_string())
    } else {
        Some(format!("(?{flags}){expression}"))
    }
}

impl fmt::Display for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.content)
    }
}

impl From<&str> for Text {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Text {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<Text> for Value {
    fn from(text: Text) -> Self {
        Self::object(text)
    }
}
