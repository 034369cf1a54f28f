//! Static checks on normalized branches.

use std::collections::HashSet;

use seine_foundation::{Error, Name, Result};

use crate::normalize::Branch;

/// Checks every branch of a normalized condition before wiring.
///
/// Two things are rejected here rather than at match time: patterns with
/// no slots, which would have no test chain to anchor, and difference
/// captures (`~?x`) whose variable has no positive binding to differ
/// from. A difference capture may take its binding from an earlier
/// positive element of the branch or from its own pattern; absence
/// elements contribute nothing downstream because their matches never
/// extend the partial match.
///
/// # Errors
///
/// Returns [`ErrorKind::EmptyPattern`](seine_foundation::ErrorKind) or
/// [`ErrorKind::UnboundNegatedVariable`](seine_foundation::ErrorKind).
pub fn validate(rule_name: &Name, branches: &[Branch]) -> Result<()> {
    for branch in branches {
        let mut bound: HashSet<Name> = HashSet::new();
        for element in branch.elements() {
            let pattern = element.pattern();
            if pattern.is_empty() {
                return Err(Error::empty_pattern(rule_name.clone()));
            }
            let vars = pattern.bound_variables();
            let own_positive: HashSet<&Name> = vars
                .iter()
                .filter(|(_, negated)| !negated)
                .map(|(name, _)| name)
                .collect();
            for (name, negated) in &vars {
                if *negated && !bound.contains(name) && !own_positive.contains(name) {
                    return Err(Error::unbound_negated_variable(
                        rule_name.clone(),
                        name.clone(),
                    ));
                }
            }
            if !element.is_negated() {
                bound.extend(
                    vars.into_iter()
                        .filter(|(_, negated)| !negated)
                        .map(|(name, _)| name),
                );
            }
        }
    }
    Ok(())
}
