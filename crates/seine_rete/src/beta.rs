//! Join wiring: turning normalized branches into beta chains.

use std::collections::HashMap;

use seine_language::{Branch, BranchElement, Pattern, Rule};

use crate::network::{Network, NodeId, Port};

/// Wires one rule's branches into the network.
///
/// Each branch becomes a chain seeded by its first pattern's test-chain
/// tail: positive elements append a join fed by the element's tail on
/// the right, negated elements append a negation monitoring the tail.
/// All branches of a rule end at the same terminal, so any branch
/// matching activates the rule. Beta nodes are never shared; only the
/// test chains are.
pub(crate) fn wire(
    net: &mut Network,
    rule: &Rule,
    branches: &[Branch],
    tails: &HashMap<Pattern, NodeId>,
) {
    let terminal = net.add_terminal(rule.name().clone(), rule.salience());
    for branch in branches {
        let [first, rest @ ..] = branch.elements() else {
            continue;
        };
        let mut current = tails[first.pattern()];
        for element in rest {
            let tail = tails[element.pattern()];
            let node = match element {
                BranchElement::Positive(_) => net.add_join(),
                BranchElement::Negated(_) => net.add_negation(),
            };
            net.connect(Some(current), node, Port::Left);
            net.connect(Some(tail), node, Port::Right);
            current = node;
        }
        net.connect(Some(current), terminal, Port::Single);
    }
}
