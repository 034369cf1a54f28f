//! Rule conditions: patterns combined with `and`, `or`, and `not`.

use std::fmt;

use crate::pattern::Pattern;

/// The left-hand side of a rule.
///
/// A condition is a tree whose leaves are patterns. `And` requires every
/// child to hold, `Or` requires at least one, and `Not` holds when its
/// child matches no fact. Compilation rewrites the tree into disjunctive
/// normal form before wiring the network, so arbitrary nesting is fine as
/// long as negation stays over single patterns or disjunctions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Every child condition must hold.
    And(Vec<Condition>),
    /// At least one child condition must hold.
    Or(Vec<Condition>),
    /// The child condition must not match any fact.
    Not(Box<Condition>),
    /// A single fact pattern.
    Pattern(Pattern),
}

/// Builds a conjunction of conditions.
#[must_use]
pub fn all(children: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::And(children.into_iter().collect())
}

/// Builds a disjunction of conditions.
#[must_use]
pub fn any(children: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Or(children.into_iter().collect())
}

/// Builds the absence test for a condition.
#[must_use]
pub fn none(child: impl Into<Condition>) -> Condition {
    Condition::Not(Box::new(child.into()))
}

impl From<Pattern> for Condition {
    fn from(pattern: Pattern) -> Self {
        Condition::Pattern(pattern)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::And(children) => write_children(f, "and", children),
            Condition::Or(children) => write_children(f, "or", children),
            Condition::Not(child) => write!(f, "(not {child})"),
            Condition::Pattern(pattern) => write!(f, "{pattern}"),
        }
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, op: &str, children: &[Condition]) -> fmt::Result {
    write!(f, "({op}")?;
    for child in children {
        write!(f, " {child}")?;
    }
    write!(f, ")")
}
