//! Property tests for network-level laws.

use std::collections::HashSet;

use proptest::prelude::*;

use seine_foundation::Fact;
use seine_language::{Pattern, Rule, Ruleset, all, any, bind, none, pred, wildcard};
use seine_rete::{Activation, Network, build};

fn pairing_rules() -> Ruleset {
    Ruleset::new()
        .with(Rule::new(
            "mated",
            all([
                Pattern::new().with("left", bind("id", wildcard())).into(),
                Pattern::new().with("right", bind("id", wildcard())).into(),
            ]),
        ))
        .unwrap()
        .with(Rule::new(
            "widowed",
            all([
                Pattern::new().with("left", bind("id", wildcard())).into(),
                none(Pattern::new().with("right", bind("id", wildcard()))),
            ]),
        ))
        .unwrap()
}

fn pool() -> Vec<Fact> {
    vec![
        Fact::new().with("left", 1),
        Fact::new().with("left", 2),
        Fact::new().with("left", 3),
        Fact::new().with("right", 1),
        Fact::new().with("right", 2),
    ]
}

fn live_set(net: &Network) -> HashSet<Activation> {
    net.activations().into_iter().collect()
}

/// Applies facts one change at a time, folding the delta stream.
fn play(net: &mut Network, additions: &[Fact], removals: &[Fact]) -> HashSet<Activation> {
    let mut live = HashSet::new();
    for fact in additions {
        for delta in net.apply(std::slice::from_ref(fact), &[]) {
            if delta.is_added() {
                live.insert(delta.activation().clone());
            } else {
                live.remove(delta.activation());
            }
        }
    }
    for fact in removals {
        for delta in net.apply(&[], std::slice::from_ref(fact)) {
            if delta.is_added() {
                live.insert(delta.activation().clone());
            } else {
                live.remove(delta.activation());
            }
        }
    }
    live
}

proptest! {
    #[test]
    fn arrival_order_is_immaterial(order in Just(pool()).prop_shuffle()) {
        let mut canonical = build(&pairing_rules()).unwrap();
        play(&mut canonical, &pool(), &[]);

        let mut shuffled = build(&pairing_rules()).unwrap();
        let folded = play(&mut shuffled, &order, &[]);

        prop_assert_eq!(live_set(&shuffled), live_set(&canonical));
        prop_assert_eq!(folded, live_set(&shuffled));
    }

    #[test]
    fn retracting_everything_leaves_nothing(
        additions in Just(pool()).prop_shuffle(),
        removals in Just(pool()).prop_shuffle(),
    ) {
        let mut net = build(&pairing_rules()).unwrap();
        let folded = play(&mut net, &additions, &removals);

        prop_assert!(net.activations().is_empty());
        prop_assert!(folded.is_empty());
    }

    #[test]
    fn or_branches_yield_one_activation_per_fact(
        ages in proptest::collection::btree_set(0i64..200, 1..12)
    ) {
        let rules = Ruleset::new()
            .with(Rule::new(
                "flagged",
                any([
                    Pattern::new()
                        .with("age", pred("even", |v| v.as_int().is_some_and(|n| n % 2 == 0)))
                        .into(),
                    Pattern::new()
                        .with("age", pred("large", |v| v.as_int().is_some_and(|n| n >= 100)))
                        .into(),
                ]),
            ))
            .unwrap();
        let mut net = build(&rules).unwrap();

        let facts: Vec<Fact> = ages.iter().map(|&n| Fact::new().with("age", n)).collect();
        net.apply(&facts, &[]);

        // A fact satisfying both branches still activates once.
        let expected = ages.iter().filter(|&&n| n % 2 == 0 || n >= 100).count();
        let activations = net.activations();
        prop_assert_eq!(activations.len(), expected);
        for activation in &activations {
            prop_assert_eq!(activation.data().len(), 1);
        }
    }
}
