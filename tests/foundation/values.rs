//! Integration tests for scalar values as fact payload.
//!
//! Exercises the exact-equality and total-order guarantees the upper
//! layers lean on when values land in hashed and sorted containers.

use std::collections::{BTreeSet, HashSet};

use seine_foundation::Value;

// =============================================================================
// Exact Equality
// =============================================================================

#[test]
fn no_cross_variant_coercion() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Bool(true), Value::Int(1));
    assert_ne!(Value::from("1"), Value::Int(1));
    assert_ne!(Value::Nil, Value::Bool(false));
}

#[test]
fn nan_is_a_usable_key() {
    let mut set = HashSet::new();
    set.insert(Value::Float(f64::NAN));
    set.insert(Value::Float(f64::NAN));
    assert_eq!(set.len(), 1);
    assert!(set.contains(&Value::Float(f64::NAN)));
}

#[test]
fn negative_zero_differs_from_positive_zero() {
    // Bit equality: the engine treats -0.0 and 0.0 as distinct contents.
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
}

// =============================================================================
// Total Order
// =============================================================================

#[test]
fn sorted_container_accepts_all_variants() {
    let mut set = BTreeSet::new();
    set.insert(Value::from("b"));
    set.insert(Value::Float(f64::NAN));
    set.insert(Value::Int(-3));
    set.insert(Value::Nil);
    set.insert(Value::Bool(true));
    set.insert(Value::from("a"));

    let order: Vec<Value> = set.into_iter().collect();
    assert_eq!(order[0], Value::Nil);
    assert_eq!(order[1], Value::Bool(true));
    assert_eq!(order[2], Value::Int(-3));
    assert_eq!(order[5], Value::from("b"));
}

#[test]
fn numbers_bridge_through_as_number() {
    assert_eq!(Value::Int(5).as_number(), Some(5.0));
    assert_eq!(Value::Float(5.5).as_number(), Some(5.5));
    assert_eq!(Value::from("5").as_number(), None);
    assert_eq!(Value::Nil.as_number(), None);
}

// =============================================================================
// Conversions
// =============================================================================

#[test]
fn from_impls_cover_common_sources() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(7i32), Value::Int(7));
    assert_eq!(Value::from(7i64), Value::Int(7));
    assert_eq!(Value::from(1.5), Value::Float(1.5));
    assert_eq!(Value::from(String::from("s")), Value::from("s"));
}

#[test]
fn display_is_unquoted_debug_is_quoted() {
    let v = Value::from("hello");
    assert_eq!(v.to_string(), "hello");
    assert_eq!(format!("{v:?}"), "\"hello\"");
}
