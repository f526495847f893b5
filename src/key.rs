//! Keys of an ordered hash.
//!
//! A [`Key`] is either an integer index or a name. Names that spell a
//! canonical decimal integer are stored as indices, so `"3"` and `3` address
//! the same slot:
//!
//! ```rust
//! use koine::Key;
//!
//! assert_eq!(Key::from("3"), Key::Index(3));
//! assert_eq!(Key::from("-12"), Key::Index(-12));
//! assert_eq!(Key::from("007"), Key::Name("007".to_string()));
//! assert_eq!(Key::from("1.5"), Key::Name("1.5".to_string()));
//! ```

use std::fmt;

/// A key in an ordered hash.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// An integer position, as produced by appending.
    Index(i64),
    /// A string name.
    Name(String),
}

impl Key {
    /// Returns the integer index, if this is an index key.
    #[inline]
    #[must_use]
    pub const fn as_index(&self) -> Option<i64> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }

    /// Returns the name, if this is a name key.
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Index(_) => None,
            Self::Name(name) => Some(name),
        }
    }

    fn normalize(name: String) -> Self {
        canonical_index(&name).map_or(Self::Name(name), Self::Index)
    }
}

/// Parses `text` as an index only when it is the canonical decimal spelling
/// of an `i64`: no sign on zero, no leading zeros, no `+`.
fn canonical_index(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == text.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical { text.parse().ok() } else { None }
}

impl fmt::Display for Key {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(formatter, "{index}"),
            Self::Name(name) => formatter.write_str(name),
        }
    }
}

impl From<i64> for Key {
    #[inline]
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for Key {
    #[inline]
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<bool> for Key {
    #[inline]
    fn from(flag: bool) -> Self {
        Self::Index(i64::from(flag))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::normalize(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::normalize(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self::normalize(name.clone())
    }
}

impl From<&Self> for Key {
    #[inline]
    fn from(key: &Self) -> Self {
        key.clone()
    }
}

// =============================================================================
// Serde
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Index(index) => serializer.serialize_i64(*index),
            Self::Name(name) => serializer.serialize_str(name),
        }
    }
}

#[cfg(feature = "serde")]
struct KeyVisitor;

#[cfg(feature = "serde")]
impl serde::de::Visitor<'_> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an integer or a string key")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Key::Index(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value)
            .map(Key::Index)
            .map_err(|_| E::custom(format!("key {value} does not fit in an i64")))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Key::from(value))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Key::from(value))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor)
    }
}
