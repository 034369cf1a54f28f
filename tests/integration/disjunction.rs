//! End-to-end tests for disjunctive conditions: each branch matches on
//! its own, converging on one terminal.

use seine::engine::Engine;
use seine::foundation::Fact;
use seine::language::{Pattern, Rule, Ruleset, any, bind, pred, wildcard};
use seine::rete::GraphNodeKind;

/// Either side of the ledger binds the same variable.
fn flagged_rules() -> Ruleset {
    let condition = any([
        Pattern::new().with("credit", bind("amount", wildcard())).into(),
        Pattern::new().with("debit", bind("amount", wildcard())).into(),
    ]);
    Ruleset::new().with(Rule::new("flagged", condition)).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn same_context_branches_stay_apart() {
    let mut engine = Engine::new(flagged_rules()).unwrap();
    let credit = engine.declare(Fact::new().with("credit", 10)).unwrap();
    engine.declare(Fact::new().with("debit", 10)).unwrap();

    // Both branches bind amount=10, so the two matches agree on their
    // context and differ only in the facts behind them.
    let activations = engine.activations();
    assert_eq!(activations.len(), 2);
    assert_eq!(activations[0].context(), activations[1].context());
    assert_ne!(activations[0].data(), activations[1].data());

    // Withdrawing one branch's fact leaves the other branch standing.
    engine.retract(credit).unwrap();
    let activations = engine.activations();
    assert_eq!(activations.len(), 1);
    assert!(activations[0].data().contains(&Fact::new().with("debit", 10)));
}

#[test]
fn a_fact_satisfying_both_branches_matches_once() {
    let condition = any([
        Pattern::new()
            .with("n", pred("even", |v| v.as_int().is_some_and(|n| n % 2 == 0)))
            .into(),
        Pattern::new()
            .with("n", pred("positive", |v| v.as_int().is_some_and(|n| n > 0)))
            .into(),
    ]);
    let rules = Ruleset::new().with(Rule::new("either", condition)).unwrap();
    let mut engine = Engine::new(rules).unwrap();

    let both = engine.declare(Fact::new().with("n", 2)).unwrap();
    assert_eq!(engine.agenda().len(), 1);
    assert_eq!(engine.run().unwrap().fired(), 1);

    engine.retract(both).unwrap();
    assert!(engine.activations().is_empty());
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn branches_converge_on_one_terminal() {
    let engine = Engine::new(flagged_rules()).unwrap();
    let graph = engine.network().graph();

    let terminals: Vec<_> = graph
        .nodes
        .iter()
        .filter(|node| node.kind == GraphNodeKind::Terminal)
        .collect();
    assert_eq!(terminals.len(), 1);
    assert_eq!(terminals[0].label, "flagged");

    // Two alpha chains feed that single terminal.
    let inbound = graph
        .edges
        .iter()
        .filter(|edge| edge.to == terminals[0].id)
        .count();
    assert_eq!(inbound, 2);
}
