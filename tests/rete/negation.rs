//! Integration tests for absence rules.

use seine_foundation::{Fact, Value};
use seine_language::{Pattern, Rule, Ruleset, all, bind, lit, none, wildcard};
use seine_rete::{Network, build};

fn single(name: &str, condition: impl Into<seine_language::Condition>) -> Network {
    let rules = Ruleset::new().with(Rule::new(name, condition)).unwrap();
    build(&rules).unwrap()
}

fn person() -> Fact {
    Fact::new().with("kind", "person")
}

// =============================================================================
// Gate flips
// =============================================================================

#[test]
fn blocker_arriving_before_the_anchor_still_gates() {
    let mut net = single("empty", none(Pattern::new().with("kind", lit("person"))));

    net.apply(&[person()], &[]);
    assert!(net.apply(&[Fact::initial()], &[]).is_empty());
    assert!(net.activations().is_empty());

    let deltas = net.apply(&[], &[person()]);
    assert_eq!(deltas.len(), 1);
    assert!(deltas[0].is_added());
}

#[test]
fn only_the_last_blocker_leaving_opens_the_gate() {
    let mut net = single("empty", none(Pattern::new().with("kind", lit("person"))));
    net.apply(&[Fact::initial()], &[]);
    assert_eq!(net.activations().len(), 1);

    let ann = person().with("name", "ann");
    let ben = person().with("name", "ben");
    let deltas = net.apply(&[ann.clone(), ben.clone()], &[]);
    assert_eq!(deltas.len(), 1, "the second blocker changes nothing");
    assert!(!deltas[0].is_added());

    assert!(net.apply(&[], &[ann]).is_empty());
    let deltas = net.apply(&[], &[ben]);
    assert_eq!(deltas.len(), 1);
    assert!(deltas[0].is_added());
}

// =============================================================================
// Binding-scoped gates
// =============================================================================

#[test]
fn gates_open_and_close_per_binding() {
    let mut net = single(
        "unshipped",
        all([
            Pattern::new().with("order", bind("id", wildcard())).into(),
            none(Pattern::new().with("shipment", bind("id", wildcard()))),
        ]),
    );

    net.apply(
        &[
            Fact::new().with("order", 1),
            Fact::new().with("order", 2),
            Fact::new().with("shipment", 1),
            Fact::new().with("shipment", 2),
        ],
        &[],
    );
    assert!(net.activations().is_empty());

    let deltas = net.apply(&[], &[Fact::new().with("shipment", 1)]);
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].activation().get("id"), Some(&Value::Int(1)));
    assert_eq!(net.activations().len(), 1);
}

#[test]
fn joins_downstream_of_a_gate_stay_current() {
    // The absence test sits mid-chain; a pattern joins after it.
    let mut net = single(
        "audit-unshipped",
        all([
            Pattern::new().with("order", bind("id", wildcard())).into(),
            none(Pattern::new().with("shipment", bind("id", wildcard()))),
            Pattern::new().with("audit", bind("id", wildcard())).into(),
        ]),
    );

    net.apply(
        &[Fact::new().with("order", 1), Fact::new().with("audit", 1)],
        &[],
    );
    assert_eq!(net.activations().len(), 1);
    assert_eq!(net.activations()[0].data().len(), 2);

    let deltas = net.apply(&[Fact::new().with("shipment", 1)], &[]);
    assert_eq!(deltas.len(), 1);
    assert!(!deltas[0].is_added());
    assert!(net.activations().is_empty());

    let deltas = net.apply(&[], &[Fact::new().with("shipment", 1)]);
    assert_eq!(deltas.len(), 1);
    assert!(deltas[0].is_added());
}

// =============================================================================
// Joint absence
// =============================================================================

#[test]
fn chained_gates_require_every_absence() {
    let mut net = single(
        "neither",
        none(seine_language::any([
            Pattern::new().with("alarm", wildcard()).into(),
            Pattern::new().with("warning", wildcard()).into(),
        ])),
    );

    net.apply(&[Fact::initial()], &[]);
    assert_eq!(net.activations().len(), 1);

    let alarm = Fact::new().with("alarm", 1);
    let warning = Fact::new().with("warning", 1);

    let deltas = net.apply(&[alarm.clone()], &[]);
    assert_eq!(deltas.len(), 1);
    assert!(!deltas[0].is_added());

    // Already gated; the second blocker is invisible downstream.
    assert!(net.apply(&[warning.clone()], &[]).is_empty());
    assert!(net.apply(&[], &[alarm]).is_empty());

    let deltas = net.apply(&[], &[warning]);
    assert_eq!(deltas.len(), 1);
    assert!(deltas[0].is_added());
}
