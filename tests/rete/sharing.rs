//! Integration tests for structural sharing between compiled rules.
//!
//! Counts are observable through `node_count`/`check_count`; where the
//! shape matters, the graph export shows the fork points.

use seine_foundation::Fact;
use seine_language::{Pattern, Rule, Ruleset, lit, none, pred};
use seine_rete::{GraphNodeKind, build};

fn ruleset(rules: Vec<Rule>) -> Ruleset {
    let mut set = Ruleset::new();
    for rule in rules {
        set.add(rule).unwrap();
    }
    set
}

// =============================================================================
// Chain reuse
// =============================================================================

#[test]
fn common_prefix_extends_without_duplication() {
    let short = Rule::new("people", Pattern::new().with("kind", lit("person")));
    let long = Rule::new(
        "adults",
        Pattern::new()
            .with("kind", lit("person"))
            .with("age", pred("adult", |v| v.as_number() >= Some(18.0))),
    );

    let alone = build(&ruleset(vec![short.clone()])).unwrap();
    let both = build(&ruleset(vec![short, long])).unwrap();

    // The longer rule adds one test and its terminal, nothing else.
    assert_eq!(both.node_count(), alone.node_count() + 2);
    assert_eq!(both.check_count(), 2);
}

#[test]
fn positive_and_negated_uses_share_one_chain() {
    let presence = Rule::new("people", Pattern::new().with("kind", lit("person")));
    let absence = Rule::new("empty", none(Pattern::new().with("kind", lit("person"))));

    let alone = build(&ruleset(vec![presence.clone()])).unwrap();
    let mut both = build(&ruleset(vec![presence, absence])).unwrap();

    // The absence rule adds its anchor test, the gate, and its terminal;
    // the person chain is reused.
    assert_eq!(both.node_count(), alone.node_count() + 3);
    assert_eq!(both.check_count(), 2);

    // The person precedes the anchor, so the gate is shut on arrival.
    let deltas = both.apply(&[Fact::new().with("kind", "person"), Fact::initial()], &[]);
    let fired: Vec<&str> = deltas
        .iter()
        .filter(|d| d.is_added())
        .map(|d| d.activation().rule().as_str())
        .collect();
    assert_eq!(fired, vec!["people"]);

    let deltas = both.apply(&[], &[Fact::new().with("kind", "person")]);
    let fired: Vec<&str> = deltas
        .iter()
        .filter(|d| d.is_added())
        .map(|d| d.activation().rule().as_str())
        .collect();
    assert_eq!(fired, vec!["empty"]);
}

// =============================================================================
// Fork points
// =============================================================================

#[test]
fn shared_heads_fork_after_the_common_check() {
    let net = build(&ruleset(vec![
        Rule::new(
            "thirty",
            Pattern::new().with("kind", lit("person")).with("age", lit(30)),
        ),
        Rule::new(
            "western",
            Pattern::new().with("kind", lit("person")).with("zone", lit("west")),
        ),
    ]))
    .unwrap();

    // Both chains start with the twice-used kind check, so the root has
    // a single child and the chains fork below it.
    let graph = net.graph();
    let root = graph.nodes.last().unwrap();
    assert_eq!(root.kind, GraphNodeKind::Root);
    let from_root: Vec<_> = graph.edges.iter().filter(|e| e.from == root.id).collect();
    assert_eq!(from_root.len(), 1);
    let head = &graph.nodes[from_root[0].to];
    assert_eq!(head.label, "kind: =\"person\"");
}

#[test]
fn distinct_literals_never_share() {
    let net = build(&ruleset(vec![
        Rule::new("thirty", Pattern::new().with("age", lit(30))),
        Rule::new("thirty-one", Pattern::new().with("age", lit(31))),
    ]))
    .unwrap();
    assert_eq!(net.check_count(), 2);
    assert_eq!(net.node_count(), 4);

    let graph = net.graph();
    let root = graph.nodes.last().unwrap();
    assert_eq!(graph.edges.iter().filter(|e| e.from == root.id).count(), 2);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn builds_are_reproducible() {
    let rules = || {
        ruleset(vec![
            Rule::new(
                "a",
                Pattern::new().with("x", lit(1)).with("y", lit(2)),
            ),
            Rule::new(
                "b",
                Pattern::new().with("x", lit(1)).with("z", lit(3)),
            ),
            Rule::new("c", none(Pattern::new().with("z", lit(3)))),
        ])
    };
    let first = build(&rules()).unwrap();
    let second = build(&rules()).unwrap();
    assert_eq!(first.graph(), second.graph());
}
