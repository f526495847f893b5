//! Heterogeneous values stored in an ordered hash.
//!
//! A [`Value`] is either a scalar, a plain array ([`Array`]: ordered
//! key/value pairs that have not been turned into a container), a shared
//! nested container, or an opaque [`Object`] handle.
//!
//! Nested containers are held through [`Shared`], so storing a container
//! inside another one does not copy it: every holder sees later mutations.
//!
//! ```rust
//! use koine::prelude::*;
//!
//! let inner = Value::shared(Hash::from_pairs([("x", 1)]));
//! let outer = Hash::from_pairs([("a", inner.clone())]);
//!
//! if let Value::Hash(shared) = &inner {
//!     shared.borrow_mut().set("y", 2);
//! }
//!
//! let seen = outer.get("a").and_then(Value::as_hash).map(|nested| nested.borrow().count());
//! assert_eq!(seen, Some(2));
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::error::HashError;
use crate::hash::Hash;
use crate::key::Key;
use crate::ordered_map::OrderedMap;

/// A nested container shared between every value slot that holds it.
pub type Shared<H> = Rc<RefCell<H>>;

/// A plain array: ordered key/value pairs, as produced by
/// [`OrderedMap::to_array`] and accepted by [`OrderedMap::create`].
pub type Array<H = Hash> = Vec<(Key, Value<H>)>;

/// An opaque value that can live inside a hash.
///
/// Any `'static` type that is `Debug + Display` qualifies. Objects are
/// compared by identity and stringified through `Display`.
pub trait Object: Any + fmt::Debug + fmt::Display {}

impl<T: Any + fmt::Debug + fmt::Display> Object for T {}

/// A value stored in a container of type `H`.
#[derive(Debug, Clone)]
pub enum Value<H = Hash> {
    /// The absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A plain array that has not been converted into a container.
    Array(Array<H>),
    /// A nested container, shared by reference.
    Hash(Shared<H>),
    /// An opaque object handle.
    Object(Rc<dyn Object>),
}

impl<H> Value<H> {
    /// Wraps a container so it can be stored as a value.
    #[inline]
    #[must_use]
    pub fn shared(container: H) -> Self {
        Self::Hash(Rc::new(RefCell::new(container)))
    }

    /// Wraps an arbitrary object.
    ///
    /// ```rust
    /// use koine::Value;
    ///
    /// #[derive(Debug)]
    /// struct Point(i32, i32);
    ///
    /// impl std::fmt::Display for Point {
    ///     fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         write!(formatter, "({}, {})", self.0, self.1)
    ///     }
    /// }
    ///
    /// let value: Value = Value::object(Point(1, 2));
    /// assert_eq!(value.to_string(), "(1, 2)");
    /// assert_eq!(value.downcast_ref::<Point>().map(|point| point.0), Some(1));
    /// ```
    #[inline]
    #[must_use]
    pub fn object<T: Object>(object: T) -> Self {
        Self::Object(Rc::new(object))
    }

    /// Builds a plain array with sequential indices starting at zero.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::Array(list(values))
    }

    /// Builds a plain array from key/value pairs.
    pub fn array<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Self>,
    {
        Self::Array(array(pairs))
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice of a [`Value::Str`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer of a [`Value::Int`].
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the pairs of a [`Value::Array`].
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array<H>> {
        match self {
            Self::Array(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Returns the shared container of a [`Value::Hash`].
    #[inline]
    #[must_use]
    pub const fn as_hash(&self) -> Option<&Shared<H>> {
        match self {
            Self::Hash(shared) => Some(shared),
            _ => None,
        }
    }

    /// Downcasts a [`Value::Object`] to a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => {
                let any: &dyn Any = &**object;
                any.downcast_ref()
            }
            _ => None,
        }
    }

    /// A short name for the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Hash(_) => "hash",
            Self::Object(_) => "object",
        }
    }

    /// Strict, type-aware equality.
    ///
    /// Scalars must have the same variant and value, arrays must match pair
    /// by pair, and containers and objects must be the very same instance.
    ///
    /// ```rust
    /// use koine::prelude::*;
    ///
    /// let one: Value = Value::Int(1);
    /// assert!(one.identical(&Value::Int(1)));
    /// assert!(!one.identical(&Value::Float(1.0)));
    /// assert!(!one.identical(&Value::from("1")));
    ///
    /// let nested = Value::shared(Hash::default());
    /// assert!(nested.identical(&nested.clone()));
    /// assert!(!nested.identical(&Value::shared(Hash::default())));
    /// ```
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => {
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right)
                        .all(|((left_key, left_value), (right_key, right_value))| {
                            left_key == right_key && left_value.identical(right_value)
                        })
            }
            (Self::Hash(left), Self::Hash(right)) => Rc::ptr_eq(left, right),
            (Self::Object(left), Self::Object(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Natural ordering used when sorting by criteria.
    ///
    /// Numbers compare numerically across `Int` and `Float`, exactly even
    /// beyond 2^53, with `0.0 == -0.0`. `NaN` sorts above `INF`, or below
    /// `-INF` when its sign bit is set. Strings compare lexicographically,
    /// booleans `false < true`, arrays by length. Values of unrelated kinds
    /// order by kind:
    /// `Null < Bool < number < Str < Array < Hash < Object`. Containers and
    /// objects have no order among themselves.
    #[must_use]
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left.cmp(right),
            (Self::Int(left), Self::Float(right)) => compare_int_float(*left, *right),
            (Self::Float(left), Self::Int(right)) => compare_int_float(*right, *left).reverse(),
            (Self::Float(left), Self::Float(right)) => left
                .partial_cmp(right)
                .unwrap_or_else(|| left.total_cmp(right)),
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Str(left), Self::Str(right)) => left.cmp(right),
            (Self::Array(left), Self::Array(right)) => left.len().cmp(&right.len()),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Str(_) => 3,
            Self::Array(_) => 4,
            Self::Hash(_) => 5,
            Self::Object(_) => 6,
        }
    }

    /// Converts a value into the key it addresses when used as an array
    /// offset.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidArgument`] for arrays, containers,
    /// objects and non-finite floats.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_key(&self) -> Result<Key, HashError> {
        match self {
            Self::Null => Ok(Key::Name(String::new())),
            Self::Bool(flag) => Ok(Key::from(*flag)),
            Self::Int(number) => Ok(Key::Index(*number)),
            Self::Float(number) if number.is_finite() => Ok(Key::Index(number.trunc() as i64)),
            Self::Str(text) => Ok(Key::from(text.as_str())),
            _ => Err(HashError::invalid_argument(format!(
                "a {} value cannot be used as a key",
                self.type_name()
            ))),
        }
    }
}

impl<H: OrderedMap> Value<H> {
    /// Replaces nested containers by plain arrays, recursively.
    #[must_use]
    pub fn flatten(&self) -> Self {
        match self {
            Self::Hash(shared) => Self::Array(shared.borrow().to_array(true)),
            Self::Array(pairs) => Self::Array(
                pairs
                    .iter()
                    .map(|(key, value)| (key.clone(), value.flatten()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Builds a plain array with sequential indices starting at zero.
pub fn list<H, I, V>(values: I) -> Array<H>
where
    I: IntoIterator<Item = V>,
    V: Into<Value<H>>,
{
    (0_i64..)
        .zip(values)
        .map(|(index, value)| (Key::Index(index), value.into()))
        .collect()
}

/// Builds a plain array from key/value pairs.
pub fn array<H, I, K, V>(pairs: I) -> Array<H>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Key>,
    V: Into<Value<H>>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<H> Default for Value<H> {
    #[inline]
    fn default() -> Self {
        Self::Null
    }
}

/// Structural equality: arrays and containers compare entry by entry, in
/// order. Objects compare by identity.
impl<H: OrderedMap> PartialEq for Value<H> {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => left == right,
            (Self::Hash(left), Self::Hash(right)) => {
                Rc::ptr_eq(left, right) || *left.borrow().entries() == *right.borrow().entries()
            }
            (Self::Object(left), Self::Object(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

/// Compares an integer with a float without rounding the integer.
#[allow(clippy::cast_possible_truncation)]
fn compare_int_float(int: i64, float: f64) -> Ordering {
    // 2^63: every i64 lies in [-LIMIT, LIMIT).
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }
    int.cmp(&(float.trunc() as i64))
        .then_with(|| 0.0_f64.partial_cmp(&float.fract()).unwrap_or(Ordering::Equal))
}

/// Writes a finite float with 14 significant digits. Exponents outside
/// `-4..14` switch to the `1.0E+25` notation.
fn write_float(formatter: &mut fmt::Formatter<'_>, number: f64) -> fmt::Result {
    let scientific = format!("{number:.13e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..14).contains(&exponent) {
        let decimals = usize::try_from(13 - exponent).unwrap_or(0);
        formatter.write_str(trim_fraction(&format!("{number:.decimals$}")))
    } else {
        let mantissa = trim_fraction(mantissa);
        let point = if mantissa.contains('.') { "" } else { ".0" };
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(formatter, "{mantissa}{point}E{sign}{}", exponent.unsigned_abs())
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// String conversion: `Null` and `false` are empty, `true` is `1`, floats
/// keep 14 significant digits, arrays and containers are `Array`, objects
/// use their own `Display`.
impl<H> fmt::Display for Value<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Bool(false) => Ok(()),
            Self::Bool(true) => formatter.write_str("1"),
            Self::Int(number) => write!(formatter, "{number}"),
            Self::Float(number) if number.is_nan() => formatter.write_str("NAN"),
            Self::Float(number) if number.is_infinite() => {
                formatter.write_str(if *number > 0.0 { "INF" } else { "-INF" })
            }
            Self::Float(number) => write_float(formatter, *number),
            Self::Str(text) => formatter.write_str(text),
            Self::Array(_) | Self::Hash(_) => formatter.write_str("Array"),
            Self::Object(object) => write!(formatter, "{object}"),
        }
    }
}

impl<H> From<()> for Value<H> {
    #[inline]
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<H> From<bool> for Value<H> {
    #[inline]
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl<H> From<i32> for Value<H> {
    #[inline]
    fn from(number: i32) -> Self {
        Self::Int(i64::from(number))
    }
}

impl<H> From<i64> for Value<H> {
    #[inline]
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl<H> From<f64> for Value<H> {
    #[inline]
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl<H> From<&str> for Value<H> {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Str(text.to_string())
    }
}

impl<H> From<String> for Value<H> {
    #[inline]
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl<H> From<Key> for Value<H> {
    fn from(key: Key) -> Self {
        match key {
            Key::Index(index) => Self::Int(index),
            Key::Name(name) => Self::Str(name),
        }
    }
}

impl<H> From<Vec<Self>> for Value<H> {
    fn from(values: Vec<Self>) -> Self {
        Self::list(values)
    }
}

impl<H> From<Array<H>> for Value<H> {
    #[inline]
    fn from(pairs: Array<H>) -> Self {
        Self::Array(pairs)
    }
}

// =============================================================================
// Serde
// =============================================================================

/// Serializes pairs as a sequence when the keys are `0..n`, as a map
/// otherwise.
#[cfg(feature = "serde")]
pub(crate) fn serialize_pairs<'a, S, H, I>(serializer: S, pairs: I) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    H: OrderedMap + 'a,
    I: IntoIterator<Item = (&'a Key, &'a Value<H>)>,
{
    use serde::ser::{SerializeMap, SerializeSeq};

    let pairs: Vec<(&Key, &Value<H>)> = pairs.into_iter().collect();
    let sequential = (0_i64..)
        .zip(&pairs)
        .all(|(position, (key, _))| key.as_index() == Some(position));

    if sequential {
        let mut sequence = serializer.serialize_seq(Some(pairs.len()))?;
        for (_, value) in pairs {
            sequence.serialize_element(value)?;
        }
        sequence.end()
    } else {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<H: OrderedMap> serde::Serialize for Value<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(number) => serializer.serialize_i64(*number),
            Self::Float(number) => serializer.serialize_f64(*number),
            Self::Str(text) => serializer.serialize_str(text),
            Self::Array(pairs) => {
                serialize_pairs(serializer, pairs.iter().map(|(key, value)| (key, value)))
            }
            Self::Hash(shared) => {
                let container = shared.borrow();
                serialize_pairs(serializer, container.iter())
            }
            Self::Object(object) => serializer.collect_str(object),
        }
    }
}

#[cfg(feature = "serde")]
struct ValueVisitor<H> {
    marker: std::marker::PhantomData<H>,
}

#[cfg(feature = "serde")]
impl<'de, H: OrderedMap> serde::de::Visitor<'de> for ValueVisitor<H> {
    type Value = Value<H>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, flag: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Bool(flag))
    }

    fn visit_i64<E>(self, number: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Int(number))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E>(self, number: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(i64::try_from(number).map_or(Value::Float(number as f64), Value::Int))
    }

    fn visit_f64<E>(self, number: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Float(number))
    }

    fn visit_str<E>(self, text: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Str(text.to_string()))
    }

    fn visit_string<E>(self, text: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Str(text))
    }

    fn visit_seq<A>(self, mut sequence: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(sequence.size_hint().unwrap_or(0));
        let mut index = 0_i64;
        while let Some(value) = sequence.next_element::<Value<H>>()? {
            pairs.push((Key::Index(index), value));
            index += 1;
        }
        Ok(Value::Array(pairs))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Key, Value<H>>()? {
            pairs.push((key, value));
        }
        Ok(Value::Array(pairs))
    }
}

#[cfg(feature = "serde")]
impl<'de, H: OrderedMap> serde::Deserialize<'de> for Value<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
