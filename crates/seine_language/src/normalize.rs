//! Condition rewriting into disjunctive normal form.
//!
//! Network wiring works on flat chains of patterns, so every condition is
//! first rewritten into a set of branches: `or` concatenates, `and` takes
//! the cross product, and `not` is pushed down to single patterns. Each
//! branch later gets its own chain of joins feeding the rule's terminal.

use seine_foundation::{Error, Result};

use crate::condition::Condition;
use crate::pattern::Pattern;
use crate::rule::Rule;

/// One element of a normalized branch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BranchElement {
    /// The pattern must match some fact.
    Positive(Pattern),
    /// The pattern must match no fact.
    Negated(Pattern),
}

impl BranchElement {
    /// The element's pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        match self {
            BranchElement::Positive(p) | BranchElement::Negated(p) => p,
        }
    }

    /// Returns true for absence tests.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        matches!(self, BranchElement::Negated(_))
    }
}

/// One conjunctive branch of a normalized condition.
///
/// Every branch starts with a positive element; branches that would start
/// with an absence test (or would be empty) are anchored on the initial
/// fact so the first join always has a left input.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Branch {
    elements: Vec<BranchElement>,
}

impl Branch {
    /// The branch's elements in join order.
    #[must_use]
    pub fn elements(&self) -> &[BranchElement] {
        &self.elements
    }
}

/// Rewrites a rule's condition into disjunctive normal form.
///
/// # Errors
///
/// Returns [`ErrorKind::EmptyCondition`](seine_foundation::ErrorKind) for
/// an `or` with no children, and
/// [`ErrorKind::UnsupportedNegation`](seine_foundation::ErrorKind) when
/// `not` wraps anything other than a pattern, a disjunction, or another
/// `not`.
pub fn normalize(rule: &Rule) -> Result<Vec<Branch>> {
    let branches = dnf(rule, rule.condition())?;
    Ok(branches
        .into_iter()
        .map(|mut elements| {
            if elements.first().is_none_or(BranchElement::is_negated) {
                elements.insert(0, BranchElement::Positive(Pattern::initial()));
            }
            Branch { elements }
        })
        .collect())
}

fn dnf(rule: &Rule, condition: &Condition) -> Result<Vec<Vec<BranchElement>>> {
    match condition {
        Condition::Pattern(pattern) => Ok(vec![vec![BranchElement::Positive(pattern.clone())]]),
        Condition::And(children) => {
            let mut branches = vec![Vec::new()];
            for child in children {
                branches = cross(branches, dnf(rule, child)?);
            }
            Ok(branches)
        }
        Condition::Or(children) => {
            if children.is_empty() {
                return Err(Error::empty_condition(rule.name().clone()));
            }
            let mut branches = Vec::new();
            for child in children {
                branches.extend(dnf(rule, child)?);
            }
            Ok(branches)
        }
        Condition::Not(inner) => negate(rule, inner),
    }
}

fn negate(rule: &Rule, inner: &Condition) -> Result<Vec<Vec<BranchElement>>> {
    match inner {
        Condition::Pattern(pattern) => Ok(vec![vec![BranchElement::Negated(pattern.clone())]]),
        // Double negation cancels.
        Condition::Not(grandchild) => dnf(rule, grandchild),
        // De Morgan: absence of any alternative is absence of each.
        Condition::Or(children) => {
            if children.is_empty() {
                return Err(Error::empty_condition(rule.name().clone()));
            }
            let mut branches = vec![Vec::new()];
            for child in children {
                branches = cross(branches, negate(rule, child)?);
            }
            Ok(branches)
        }
        Condition::And(children) => match children.as_slice() {
            [only] => negate(rule, only),
            _ => Err(Error::unsupported_negation(rule.name().clone())),
        },
    }
}

fn cross(
    lhs: Vec<Vec<BranchElement>>,
    rhs: Vec<Vec<BranchElement>>,
) -> Vec<Vec<BranchElement>> {
    let mut out = Vec::with_capacity(lhs.len() * rhs.len());
    for left in &lhs {
        for right in &rhs {
            let mut branch = left.clone();
            branch.extend(right.iter().cloned());
            out.push(branch);
        }
    }
    out
}
