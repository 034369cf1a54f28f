//! Network construction from a ruleset.

use seine_foundation::{Error, Result};
use seine_language::{Branch, Rule, Ruleset, normalize, validate};

use crate::alpha;
use crate::beta;
use crate::network::Network;

/// Compiles a ruleset into a match network.
///
/// Conditions are normalized and validated up front, so a rule that can
/// never be wired fails here rather than misbehaving at match time. The
/// returned network is empty of matches; feed it facts with
/// [`Network::apply`].
///
/// # Errors
///
/// Returns [`ErrorKind::EmptyRuleset`](seine_foundation::ErrorKind) for
/// a ruleset with no rules, and passes through normalization and
/// validation errors naming the offending rule.
pub fn build(rules: &Ruleset) -> Result<Network> {
    if rules.is_empty() {
        return Err(Error::empty_ruleset());
    }
    let mut compiled: Vec<(&Rule, Vec<Branch>)> = Vec::with_capacity(rules.len());
    for rule in rules {
        let branches = normalize(rule)?;
        validate(rule.name(), &branches)?;
        compiled.push((rule, branches));
    }
    let mut net = Network::new();
    let tails = alpha::compile(&mut net, &compiled);
    for (rule, branches) in &compiled {
        beta::wire(&mut net, rule, branches, &tails);
    }
    Ok(net)
}
