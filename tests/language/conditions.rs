//! Integration tests for condition trees.
//!
//! Conditions only give rules shape here; what they mean is decided by
//! normalization and the network, tested elsewhere.

use std::collections::HashSet;

use seine_language::{Condition, Pattern, all, any, lit, none};

fn kind(k: &str) -> Pattern {
    Pattern::new().with("kind", lit(k))
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn patterns_convert_into_leaf_conditions() {
    let leaf: Condition = kind("person").into();
    assert!(matches!(leaf, Condition::Pattern(_)));

    let tree = all([kind("person").into(), none(kind("robot"))]);
    let Condition::And(children) = &tree else {
        panic!("expected And, got {tree}");
    };
    assert_eq!(children.len(), 2);
}

#[test]
fn builders_nest_to_any_depth() {
    let tree = all([
        kind("person").into(),
        any([kind("employee").into(), kind("student").into()]),
        none(any([kind("banned").into(), kind("retired").into()])),
    ]);
    let Condition::And(children) = &tree else {
        panic!("expected And, got {tree}");
    };
    assert!(matches!(children[1], Condition::Or(_)));
    assert!(matches!(&children[2], Condition::Not(inner) if matches!(**inner, Condition::Or(_))));
}

#[test]
fn empty_combinators_are_representable() {
    // Legality is normalization's call, not the tree's.
    assert_eq!(all([]).to_string(), "(and)");
    assert_eq!(any([]).to_string(), "(or)");
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn equal_trees_collapse_in_hashed_containers() {
    let build = || all([kind("person").into(), none(kind("robot"))]);
    let mut seen: HashSet<Condition> = HashSet::new();
    seen.insert(build());
    seen.insert(build());
    assert_eq!(seen.len(), 1);

    seen.insert(all([none(kind("robot")), kind("person").into()]));
    assert_eq!(seen.len(), 2, "child order is part of the identity");
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_parenthesizes_the_tree() {
    let tree = all([
        kind("person").into(),
        any([kind("employee").into(), kind("student").into()]),
        none(kind("banned")),
    ]);
    assert_eq!(
        tree.to_string(),
        "(and {kind: =\"person\"} \
         (or {kind: =\"employee\"} {kind: =\"student\"}) \
         (not {kind: =\"banned\"}))"
    );
}
