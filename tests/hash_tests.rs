//! Unit tests for Hash.
//!
//! Covers construction, the accessor family, traversal and every
//! combinator through the public API.

use koine::prelude::*;
use rstest::{fixture, rstest};
use std::fmt;

#[fixture]
fn foo_bar() -> Hash {
    Hash::from_pairs([("foo", "foobar"), ("bar", "barfoo")])
}

#[fixture]
fn letters() -> Hash {
    Hash::from_pairs([("a", "b"), ("c", "d")])
}

#[derive(Debug)]
struct Marker;

impl fmt::Display for Marker {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("marker")
    }
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_without_values_is_empty() {
    let hash = Hash::new(Vec::new(), true);
    assert!(hash.is_empty());
    assert_eq!(hash.to_array(true), Array::new());
}

#[rstest]
fn test_to_array_round_trips_through_new() {
    let inner: Value = Value::array([("x", 1), ("y", 2)]);
    let pairs: [(&str, Value); 3] = [("a", Value::from("b")), ("n", inner), ("z", Value::Null)];
    let hash = Hash::from_pairs(pairs);

    let rebuilt = Hash::new(hash.to_array(true), true);
    assert_eq!(rebuilt, hash);
    assert_eq!(rebuilt.to_array(true), hash.to_array(true));
}

#[rstest]
fn test_to_array_non_recursive_shares_nested_containers() {
    let inner: Value = Value::array([("x", 1)]);
    let hash = Hash::from_pairs([("n", inner)]);

    let shallow = hash.to_array(false);
    assert!(matches!(shallow[0].1, Value::Hash(_)));
    assert!(shallow[0].1.identical(hash.get("n").unwrap_or(&Value::Null)));

    let deep = hash.to_array(true);
    assert!(matches!(deep[0].1, Value::Array(_)));
}

#[rstest]
fn test_create_empty_returns_empty_container() {
    let created = Hash::create_empty();
    assert!(created.is_empty());

    let params: Value = Value::array([("a", "b")]);
    let created = Hash::create(params.as_array().cloned().unwrap_or_default(), true);
    assert_eq!(created.to_array(true), params.as_array().cloned().unwrap_or_default());
}

// =============================================================================
// Accessors
// =============================================================================

#[rstest]
fn test_get_absent_key_is_none() {
    let hash = Hash::from_pairs([("a", 1)]);
    assert_eq!(hash.get("b"), None);
    assert_eq!(hash.get_or("b", Value::from("default")), Value::from("default"));
}

#[rstest]
fn test_set_overwrite_keeps_position() {
    let mut hash = Hash::from_pairs([("a", 1), ("b", 2)]);
    hash.set("a", 3);
    assert_eq!(hash.keys(), Hash::from_list(["a", "b"]));
    assert_eq!(hash.get("a"), Some(&Value::Int(3)));
}

#[rstest]
fn test_push_uses_next_index_after_removal() {
    let mut hash = Hash::from_list(["a", "b", "c"]);
    hash.delete(2);
    hash.push("d");
    assert_eq!(hash.keys(), Hash::from_list([0, 1, 3]));
}

#[rstest]
fn test_push_after_maximum_index_keeps_existing_value() {
    let mut hash = Hash::default();
    hash.set(i64::MAX, "kept");

    hash.push("pushed");

    assert_eq!(hash.count(), 1);
    assert_eq!(hash.get(i64::MAX), Some(&Value::from("kept")));
}

#[rstest]
fn test_try_push_reports_exhausted_index() {
    let mut hash = Hash::from_pairs([(i64::MAX, "kept")]);
    let result = hash.try_push("pushed").map(|hash| hash.count());
    assert!(matches!(result, Err(HashError::InvalidArgument { .. })));
    assert_eq!(hash, Hash::from_pairs([(i64::MAX, "kept")]));

    let mut hash = Hash::from_list(["a"]);
    assert_eq!(hash.try_push("b").map(|hash| hash.count()), Ok(2));
    assert_eq!(hash.get(1), Some(&Value::from("b")));
}

#[rstest]
fn test_push_ignores_string_keys() {
    let mut hash = Hash::from_pairs([("name", "x")]);
    hash.push("first");
    assert_eq!(hash.get(0), Some(&Value::from("first")));
}

#[rstest]
fn test_has_key(foo_bar: Hash) {
    let hash = foo_bar.select(|_, key| key == &Key::from("foo"));
    assert!(hash.has_key("foo"));
    assert!(!hash.has_key("bar"));
}

#[rstest]
fn test_has_key_and_exists_disagree_on_null() {
    let pairs: [(&str, Value); 2] = [("set", Value::from(0)), ("null", Value::Null)];
    let hash = Hash::from_pairs(pairs);

    assert!(hash.has_key("null"));
    assert!(!hash.exists("null"));
    assert!(hash.exists("set"));
    assert!(!hash.exists("missing"));
}

#[rstest]
fn test_delete_returns_removed_value() {
    let object = Value::object(Marker);
    let pairs: [(&str, Value); 2] = [("foo", object.clone()), ("b", Value::from("bar"))];
    let mut hash = Hash::from_pairs(pairs);

    let deleted = hash.delete("foo");
    assert!(deleted.is_some_and(|deleted| deleted.identical(&object)));
    assert!(!hash.has_key("foo"));
    assert_eq!(hash, Hash::from_pairs([("b", "bar")]));
}

#[rstest]
fn test_delete_absent_key_is_none() {
    let mut hash = Hash::from_pairs([("a", 1)]);
    assert_eq!(hash.delete("zzz"), None);
    assert_eq!(hash.count(), 1);
}

#[rstest]
fn test_fetch() {
    let hash = Hash::from_pairs([("foo", "bar")]);
    assert_eq!(hash.fetch("foo"), Ok(Value::from("bar")));

    let error = hash.fetch("bar").unwrap_err();
    assert_eq!(error, HashError::invalid_key("bar"));
    assert_eq!(error.to_string(), "Invalid key 'bar'");
}

#[rstest]
fn test_fetch_with_fallbacks() {
    let hash = Hash::from_pairs([("foo", "bar")]);
    assert_eq!(hash.fetch_or("foo", Value::from("x")), Value::from("bar"));
    assert_eq!(hash.fetch_or("zzz", Value::from("x")), Value::from("x"));
    assert_eq!(hash.fetch_or("zzz", Value::Null), Value::Null);
    assert_eq!(
        hash.fetch_or_else("zzz", |key| Value::from(format!("no {key}"))),
        Value::from("no zzz")
    );
}

#[rstest]
fn test_fetch_does_not_recover_null_values() {
    let pairs: [(&str, Value); 1] = [("null", Value::Null)];
    let hash = Hash::from_pairs(pairs);
    assert_eq!(hash.fetch("null"), Ok(Value::Null));
}

// =============================================================================
// Traversal
// =============================================================================

#[rstest]
fn test_each_chains(letters: Hash) {
    let mut collected = Hash::default();
    letters
        .each(|value, _| {
            collected.push(value.clone());
        })
        .each(|value, _| {
            collected.push(value.clone());
        });
    assert_eq!(collected, Hash::from_list(["b", "d", "b", "d"]));
}

#[rstest]
fn test_each_with_key(letters: Hash) {
    let mut collected = Hash::default();
    letters.each(|value, key| {
        collected.push(key.clone()).push(value.clone());
    });
    assert_eq!(collected, Hash::from_list(["a", "b", "c", "d"]));
}

#[rstest]
fn test_nested_traversals_are_independent(letters: Hash) {
    let mut pairs = Vec::new();
    for (outer, _) in letters.iter() {
        for (inner, _) in letters.iter() {
            pairs.push(format!("{outer}{inner}"));
        }
    }
    assert_eq!(pairs, vec!["aa", "ac", "ca", "cc"]);
}

#[rstest]
fn test_iteration_is_restartable(letters: Hash) {
    let first: Vec<&Key> = letters.iter().map(|(key, _)| key).collect();
    let second: Vec<&Key> = letters.iter().map(|(key, _)| key).collect();
    assert_eq!(first, second);
}

// =============================================================================
// Queries
// =============================================================================

#[rstest]
fn test_is_empty_and_count() {
    let mut hash = Hash::from_pairs([("foo", "bar")]);
    assert!(!hash.is_empty());
    assert_eq!(hash.count(), 1);

    hash.delete("foo");
    assert!(hash.is_empty());
    assert_eq!(hash.count(), 0);
}

#[rstest]
fn test_count_is_shallow() {
    let nested: Value = Value::list([1, 2, 3]);
    let hash = Hash::from_pairs([("n", nested)]);
    assert_eq!(hash.count(), 1);
}

#[rstest]
fn test_keys(foo_bar: Hash) {
    let keys = foo_bar.keys();
    assert_eq!(keys, Hash::from_list(["foo", "bar"]));
    assert_eq!(keys.first(), Some(&Value::from("foo")));
}

#[rstest]
fn test_keys_of_integer_indices_are_integers() {
    let keys = Hash::from_list(["x", "y"]).keys();
    assert_eq!(keys, Hash::from_list([0, 1]));
}

#[rstest]
fn test_has_value_is_strict() {
    let hash = Hash::from_list([Value::Int(1), Value::from("2")]);
    assert!(hash.has_value(&Value::Int(1)));
    assert!(!hash.has_value(&Value::from("1")));
    assert!(!hash.has_value(&Value::Int(2)));
}

#[rstest]
fn test_values_at() {
    let hash = Hash::from_pairs([("a", "b"), ("c", "b")]);
    let expected = Hash::from_list([Value::from("b"), Value::Null]);
    assert_eq!(hash.values_at(["a", "b"]), expected);
    assert_eq!(hash.values_at(vec![Key::from("a"), Key::from("zzz")]), expected);
}

#[rstest]
#[case("", "bd")]
#[case(", ", "b, d")]
fn test_join(letters: Hash, #[case] separator: &str, #[case] expected: &str) {
    assert_eq!(letters.join(separator), expected);
}

#[rstest]
fn test_join_stringifies_scalars() {
    let hash = Hash::from_list([Value::Int(1), Value::Null, Value::Bool(true), Value::Float(1.5)]);
    assert_eq!(hash.join("|"), "1||1|1.5");
}

#[rstest]
fn test_join_rounds_floats_to_fourteen_digits() {
    let hash = Hash::from_list([0.1 + 0.2, 1e20, 0.000_01]);
    assert_eq!(hash.join(","), "0.3,1.0E+20,1.0E-5");
}

#[rstest]
fn test_first_and_last() {
    let hash = Hash::from_list(["a", "b"]);
    assert_eq!(hash.first(), Some(&Value::from("a")));
    assert_eq!(hash.last(), Some(&Value::from("b")));

    let empty = Hash::default();
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
}

// =============================================================================
// Combinators
// =============================================================================

#[rstest]
fn test_compact() {
    let pairs: [(&str, Value); 3] = [
        ("foo", Value::from("bar")),
        ("null", Value::Null),
        ("empty", Value::from("")),
    ];
    let compact = Hash::from_pairs(pairs).compact();
    assert_eq!(compact, Hash::from_pairs([("foo", "bar")]));
}

#[rstest]
fn test_compact_keeps_zero_false_and_empty_containers() {
    let empty: Value = Value::list(Vec::<Value>::new());
    let pairs: [(&str, Value); 3] = [
        ("zero", Value::Int(0)),
        ("no", Value::Bool(false)),
        ("e", empty),
    ];
    let hash = Hash::from_pairs(pairs);
    assert_eq!(hash.compact().count(), 3);
}

#[rstest]
fn test_reject_by_value(foo_bar: Hash) {
    let filtered = foo_bar.reject(|value, _| value.as_str() == Some("barfoo"));
    assert_eq!(filtered, Hash::from_pairs([("foo", "foobar")]));
}

#[rstest]
fn test_reject_by_key(foo_bar: Hash) {
    let filtered = foo_bar.reject(|_, key| key.as_name() == Some("bar"));
    assert_eq!(filtered, Hash::from_pairs([("foo", "foobar")]));
}

#[rstest]
fn test_select_by_value(foo_bar: Hash) {
    let filtered = foo_bar.select(|value, _| value.as_str() != Some("barfoo"));
    assert_eq!(filtered, Hash::from_pairs([("foo", "foobar")]));
}

#[rstest]
fn test_select_by_key(foo_bar: Hash) {
    let filtered = foo_bar.select(|_, key| key.as_name() == Some("foo"));
    assert_eq!(filtered, Hash::from_pairs([("foo", "foobar")]));
}

#[rstest]
fn test_select_keeps_integer_keys() {
    let hash = Hash::from_list([1, 2, 3, 4]);
    let even = hash.select(|value, _| value.as_int().is_some_and(|number| number % 2 == 0));
    assert_eq!(even.keys(), Hash::from_list([1, 3]));
}

#[rstest]
fn test_combinators_leave_receiver_untouched(foo_bar: Hash) {
    let before = foo_bar.clone();
    let _ = foo_bar.select(|_, _| false);
    let _ = foo_bar.map(|_, _| Value::Null);
    let _ = foo_bar.merge(&Hash::from_pairs([("foo", 1)]));
    assert_eq!(foo_bar, before);
}

#[rstest]
fn test_map(letters: Hash) {
    let mapped = letters.map(|value, _| value.clone());
    assert_eq!(mapped, Hash::from_list(["b", "d"]));
    assert_eq!(mapped.keys(), Hash::from_list([0, 1]));
}

#[rstest]
fn test_fold_and_inject() {
    let hash = Hash::from_pairs([("a", 1), ("b", 2), ("c", 3)]);
    let keys = hash.fold(String::new(), |mut accumulator, _, key| {
        accumulator.push_str(&key.to_string());
        accumulator
    });
    assert_eq!(keys, "abc");

    let sum = hash.inject(
        Some(Value::Int(0)),
        Some(Box::new(|memo: Value, value: &Value, _: &Key| {
            Value::Int(memo.as_int().unwrap_or(0) + value.as_int().unwrap_or(0))
        })),
    );
    assert_eq!(sum, Ok(Value::Int(6)));
}

#[rstest]
fn test_inject_without_memo_starts_from_null() {
    let hash = Hash::from_list([1]);
    let seen = hash.inject(None, Some(Box::new(|memo: Value, _: &Value, _: &Key| memo)));
    assert_eq!(seen, Ok(Value::Null));
}

#[rstest]
fn test_inject_without_reducer_fails() {
    let error = Hash::default().inject(Some(Value::Int(1)), None).unwrap_err();
    assert_eq!(error, HashError::invalid_argument("No callback was given"));
}

#[rstest]
fn test_group_by_function_keeps_first_seen_order() {
    let words = Hash::from_list(["ax", "bx", "ay"]);
    let groups = words
        .group_by(Criteria::by_function(|word: &Value, _: &Key| {
            Value::from(word.to_string().split_off(1))
        }))
        .unwrap();

    assert_eq!(groups.keys(), Hash::from_list(["x", "y"]));
    assert_eq!(groups.get("x"), Some(&Value::list(["ax", "bx"])));
    assert_eq!(groups.get("y"), Some(&Value::list(["ay"])));
}

#[rstest]
fn test_group_by_key_name() {
    let person = |name: &str, team: i64| -> Value {
        Value::array([("name", Value::from(name)), ("team", Value::from(team))])
    };
    let people = Hash::from_list([person("ana", 1), person("bob", 2), person("cid", 1)]);

    let teams = people.group_by("team").unwrap();
    assert_eq!(teams.keys(), Hash::from_list([1, 2]));
    let first_team = teams.get(1).and_then(Value::as_array).map(Vec::len);
    assert_eq!(first_team, Some(2));
}

#[rstest]
fn test_group_by_missing_key_fails() {
    let record: Value = Value::array([("name", "ana")]);
    let hash = Hash::from_list([record]);
    assert_eq!(hash.group_by("team"), Err(HashError::invalid_key("team")));
}

#[rstest]
fn test_group_by_key_name_on_scalars_fails() {
    let hash = Hash::from_list([1, 2]);
    assert!(matches!(
        hash.group_by("team"),
        Err(HashError::InvalidArgument { .. })
    ));
}

#[rstest]
fn test_sort_by_function_is_stable() {
    let words = Hash::from_list(["pear", "fig", "kiwi", "apple", "yam"]);
    let sorted = words
        .sort_by(Criteria::by_function(|word: &Value, _: &Key| {
            Value::from(i64::try_from(word.to_string().len()).unwrap_or(i64::MAX))
        }))
        .unwrap();
    assert_eq!(
        sorted,
        Hash::from_list(["fig", "yam", "pear", "kiwi", "apple"])
    );
}

#[rstest]
fn test_sort_by_key_name_reindexes() {
    let person = |name: &str, age: i64| -> Value {
        Value::array([("name", Value::from(name)), ("age", Value::from(age))])
    };
    let people = Hash::from_pairs([("x", person("ana", 31)), ("y", person("bob", 25))]);

    let sorted = people.sort_by("age").unwrap();
    assert_eq!(sorted.keys(), Hash::from_list([0, 1]));
    let names = sorted.map(|person, _| {
        person
            .as_hash()
            .map_or(Value::Null, |person| person.borrow().get_or("name", Value::Null))
    });
    assert_eq!(names.join(","), "bob,ana");
}

#[rstest]
fn test_sort_by_compares_numbers_numerically() {
    let hash = Hash::from_list([Value::Int(10), Value::Float(2.5), Value::Int(3)]);
    let sorted = hash
        .sort_by(Criteria::by_function(|value: &Value, _: &Key| value.clone()))
        .unwrap();
    assert_eq!(sorted.join(" "), "2.5 3 10");
}

fn sort_by_identity(hash: &Hash) -> Hash {
    hash.sort_by(Criteria::by_function(|value: &Value, _: &Key| value.clone()))
        .unwrap()
}

#[rstest]
fn test_sort_by_keeps_fractional_floats_apart() {
    let sorted = sort_by_identity(&Hash::from_list([2.7, 2.2, 2.5]));
    assert_eq!(sorted, Hash::from_list([2.2, 2.5, 2.7]));
    assert_eq!(sorted.join(" "), "2.2 2.5 2.7");
}

#[rstest]
fn test_sort_by_orders_booleans_before_numbers() {
    let hash = Hash::from_list([Value::Int(1), Value::Int(0), Value::Bool(true)]);
    assert_eq!(
        sort_by_identity(&hash),
        Hash::from_list([Value::Bool(true), Value::Int(0), Value::Int(1)])
    );
}

#[rstest]
fn test_sort_by_accepts_non_finite_criteria() {
    let hash = Hash::from_list([f64::INFINITY, 1.0, f64::NEG_INFINITY]);
    assert_eq!(sort_by_identity(&hash).join(" "), "-INF 1 INF");
}

#[rstest]
fn test_sort_by_accepts_container_criteria() {
    let hash = Hash::from_list([Value::list([1, 2]), Value::list([1])]);
    assert_eq!(sort_by_identity(&hash), hash);
}

#[rstest]
fn test_group_by_still_rejects_non_finite_criteria() {
    let hash = Hash::from_list([f64::INFINITY]);
    let result = hash.group_by(Criteria::by_function(|value: &Value, _: &Key| value.clone()));
    assert!(matches!(result, Err(HashError::InvalidArgument { .. })));
}

// =============================================================================
// Merging
// =============================================================================

#[rstest]
fn test_merge_overwrites_and_appends() {
    let left = Hash::from_pairs([("a", 1), ("b", 2)]);
    let right = Hash::from_pairs([("b", 3), ("c", 4)]);
    assert_eq!(left.merge(&right), Hash::from_pairs([("a", 1), ("b", 3), ("c", 4)]));
}

#[rstest]
fn test_merge_is_shallow_and_deep_merge_recurses() {
    let x: Value = Value::array([("x", 1)]);
    let y: Value = Value::array([("y", 2)]);
    let both: Value = Value::array([("x", 1), ("y", 2)]);
    let left = Hash::from_pairs([("a", x)]);
    let right = Hash::from_pairs([("a", y)]);

    assert_eq!(left.merge(&right), right);
    assert_eq!(left.deep_merge(&right), Hash::from_pairs([("a", both)]));
}

#[rstest]
fn test_deep_merge_leaves_nested_receiver_untouched() {
    let x: Value = Value::array([("x", 1)]);
    let y: Value = Value::array([("y", 2)]);
    let left = Hash::from_pairs([("a", x)]);
    let right = Hash::from_pairs([("a", y)]);

    let _ = left.deep_merge(&right);
    let nested = left.get("a").and_then(Value::as_hash).map(|nested| nested.borrow().count());
    assert_eq!(nested, Some(1));
}

#[rstest]
fn test_deep_merge_scalar_replaces_container() {
    let x: Value = Value::array([("x", 1)]);
    let left = Hash::from_pairs([("a", x)]);
    let right = Hash::from_pairs([("a", 5)]);
    assert_eq!(left.deep_merge(&right), right);
}

#[rstest]
fn test_merge_with_resolver() {
    let left = Hash::from_pairs([("a", 1), ("b", 2)]);
    let right = Hash::from_pairs([("b", 10), ("c", 4)]);
    let merged = left.merge_with(&right, |key, old, new| {
        Value::from(format!("{key}:{old}+{new}"))
    });

    let expected: [(&str, Value); 3] = [
        ("a", Value::Int(1)),
        ("b", Value::from("b:2+10")),
        ("c", Value::Int(4)),
    ];
    assert_eq!(merged, Hash::from_pairs(expected));
}

// =============================================================================
// Clear
// =============================================================================

#[rstest]
fn test_clear(foo_bar: Hash) {
    let mut hash = foo_bar;
    hash.clear();
    assert_eq!(hash.count(), 0);
    assert!(hash.is_empty());
}

#[rstest]
fn test_clear_keeps_next_index() {
    let mut hash = Hash::from_list(["a", "b"]);
    hash.clear().push("c");
    assert_eq!(hash.keys(), Hash::from_list([2]));
}
