//! Integration tests for fact propagation through compiled networks.

use std::collections::HashSet;

use seine_foundation::Fact;
use seine_language::{Pattern, Rule, Ruleset, bind, lit, wildcard};
use seine_rete::{ActivationDelta, Network, build};

fn person(name: &str) -> Fact {
    Fact::new().with("kind", "person").with("name", name)
}

fn people_network() -> Network {
    let rules = Ruleset::new()
        .with(Rule::new("people", Pattern::new().with("kind", lit("person"))))
        .unwrap();
    build(&rules).unwrap()
}

/// Folds a delta stream into the set of live activations.
fn fold(
    live: &mut HashSet<seine_rete::Activation>,
    deltas: &[ActivationDelta],
) {
    for delta in deltas {
        if delta.is_added() {
            live.insert(delta.activation().clone());
        } else {
            live.remove(delta.activation());
        }
    }
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn replacement_in_one_batch_adds_then_removes() {
    let mut net = people_network();
    net.apply(&[person("ann")], &[]);

    let deltas = net.apply(&[person("ben")], &[person("ann")]);
    assert_eq!(deltas.len(), 2);
    assert!(deltas[0].is_added());
    assert!(!deltas[1].is_added());
    assert!(deltas[0].activation().data().to_string().contains("ben"));
    assert!(deltas[1].activation().data().to_string().contains("ann"));
    assert_eq!(net.activations().len(), 1);
}

#[test]
fn one_fact_fires_rules_in_declaration_order() {
    let rules = Ruleset::new()
        .with(Rule::new("first", Pattern::new().with("kind", lit("person"))))
        .unwrap()
        .with(Rule::new("second", Pattern::new().with("kind", lit("person"))))
        .unwrap();
    let mut net = build(&rules).unwrap();

    let deltas = net.apply(&[person("ann")], &[]);
    let fired: Vec<&str> = deltas
        .iter()
        .map(|d| d.activation().rule().as_str())
        .collect();
    assert_eq!(fired, vec!["first", "second"]);
}

// =============================================================================
// Retraction edges
// =============================================================================

#[test]
fn retracting_an_unseen_fact_is_inert() {
    let rules = Ruleset::new()
        .with(Rule::new(
            "pairs",
            seine_language::all([
                Pattern::new().with("a", bind("x", wildcard())).into(),
                Pattern::new().with("b", bind("x", wildcard())).into(),
            ]),
        ))
        .unwrap();
    let mut net = build(&rules).unwrap();
    net.apply(&[Fact::new().with("b", 1)], &[]);

    // The withdrawal crosses the join but finds nothing to unwind.
    let deltas = net.apply(&[], &[Fact::new().with("a", 1)]);
    assert!(deltas.is_empty());
    assert!(net.activations().is_empty());
}

#[test]
fn retracting_a_non_matching_fact_is_inert() {
    let mut net = people_network();
    net.apply(&[person("ann")], &[]);
    let deltas = net.apply(&[], &[Fact::new().with("kind", "robot")]);
    assert!(deltas.is_empty());
    assert_eq!(net.activations().len(), 1);
}

// =============================================================================
// Consistency
// =============================================================================

#[test]
fn delta_stream_tracks_the_activation_view() {
    let rules = Ruleset::new()
        .with(Rule::new(
            "matched",
            seine_language::all([
                Pattern::new().with("left", bind("id", wildcard())).into(),
                Pattern::new().with("right", bind("id", wildcard())).into(),
            ]),
        ))
        .unwrap()
        .with(Rule::new("lefts", Pattern::new().with("left", wildcard())))
        .unwrap();
    let mut net = build(&rules).unwrap();

    let left = |id: i64| Fact::new().with("left", id);
    let right = |id: i64| Fact::new().with("right", id);
    let script: Vec<(Vec<Fact>, Vec<Fact>)> = vec![
        (vec![left(1), left(2)], vec![]),
        (vec![right(1)], vec![]),
        (vec![right(2)], vec![left(1)]),
        (vec![], vec![right(1)]),
        (vec![left(1)], vec![]),
    ];

    let mut live = HashSet::new();
    for (additions, removals) in script {
        let deltas = net.apply(&additions, &removals);
        fold(&mut live, &deltas);
        let view: HashSet<_> = net.activations().into_iter().collect();
        assert_eq!(live, view);
    }
}

#[test]
fn reset_restores_a_clean_slate() {
    let mut net = people_network();
    net.apply(&[person("ann"), person("ben")], &[]);
    let before: HashSet<_> = net.activations().into_iter().collect();
    assert_eq!(before.len(), 2);

    net.reset();
    assert!(net.activations().is_empty());

    net.apply(&[person("ann"), person("ben")], &[]);
    let after: HashSet<_> = net.activations().into_iter().collect();
    assert_eq!(before, after);
}
