//! Test-chain compilation with rank-driven prefix sharing.
//!
//! Every pattern becomes a chain of test nodes walked from the root.
//! Checks are ordered by how many patterns use them, most-used first, and
//! rules are laid down most-shareable first, so when a chain is walked it
//! tends to find its high-traffic prefix already built and reuses it.

use std::cmp::Reverse;
use std::collections::HashMap;

use seine_language::{Branch, Pattern, Rule};

use crate::check::CheckId;
use crate::network::{Network, NodeId, Port};

/// Compiles the test chains for every pattern of every branch, returning
/// each distinct pattern's chain tail for the join wiring to tap.
pub(crate) fn compile(
    net: &mut Network,
    rules: &[(&Rule, Vec<Branch>)],
) -> HashMap<Pattern, NodeId> {
    // Intern each distinct pattern's checks and count how often every
    // check is wanted, one count per pattern occurrence.
    let mut pattern_checks: HashMap<Pattern, Vec<CheckId>> = HashMap::new();
    let mut rank: HashMap<CheckId, usize> = HashMap::new();
    for (_, branches) in rules {
        for branch in branches {
            for element in branch.elements() {
                let pattern = element.pattern();
                let checks = pattern_checks
                    .entry(pattern.clone())
                    .or_insert_with(|| net.registry_mut().intern_pattern(pattern));
                for &check in checks.iter() {
                    *rank.entry(check).or_insert(0) += 1;
                }
            }
        }
    }

    // Within a pattern, widely shared checks sit closest to the root.
    for checks in pattern_checks.values_mut() {
        checks.sort_by_key(|&id| (Reverse(rank[&id]), id));
    }

    // Rules with the highest average check rank build their chains
    // first, seeding the prefixes later rules preferentially reuse.
    #[allow(clippy::cast_precision_loss)]
    let averages: Vec<f64> = rules
        .iter()
        .map(|(_, branches)| {
            let mut sum = 0usize;
            let mut count = 0usize;
            for branch in branches {
                for element in branch.elements() {
                    for check in &pattern_checks[element.pattern()] {
                        sum += rank[check];
                        count += 1;
                    }
                }
            }
            if count == 0 { 0.0 } else { sum as f64 / count as f64 }
        })
        .collect();
    let mut order: Vec<usize> = (0..rules.len()).collect();
    order.sort_by(|&a, &b| {
        averages[b]
            .total_cmp(&averages[a])
            .then_with(|| rules[a].0.name().cmp(rules[b].0.name()))
    });

    let mut tails: HashMap<Pattern, NodeId> = HashMap::new();
    for index in order {
        let (_, branches) = &rules[index];
        for branch in branches {
            for element in branch.elements() {
                let pattern = element.pattern();
                if tails.contains_key(pattern) {
                    continue;
                }
                let tail = walk_chain(net, &pattern_checks[pattern]);
                tails.insert(pattern.clone(), tail);
            }
        }
    }
    tails
}

/// Walks a chain from the root, reusing existing test nodes where the
/// next check already hangs off the current node.
fn walk_chain(net: &mut Network, checks: &[CheckId]) -> NodeId {
    let mut parent: Option<NodeId> = None;
    for &check in checks {
        let next = match net.test_child(parent, check) {
            Some(existing) => existing,
            None => {
                let node = net.add_test(check);
                net.connect(parent, node, Port::Single);
                node
            }
        };
        parent = Some(next);
    }
    parent.expect("validated patterns carry at least one check")
}
