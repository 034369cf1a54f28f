//! Error types for the Seine system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use thiserror::Error;

use crate::fact::{Fact, FactId};
use crate::name::Name;

/// The main error type for Seine operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a reserved attribute error.
    #[must_use]
    pub fn reserved_attribute(name: Name) -> Self {
        Self::new(ErrorKind::ReservedAttribute(name))
    }

    /// Creates a duplicate fact error.
    #[must_use]
    pub fn duplicate_fact(fact: Fact) -> Self {
        Self::new(ErrorKind::DuplicateFact(fact))
    }

    /// Creates an unknown fact error.
    #[must_use]
    pub fn unknown_fact(id: FactId) -> Self {
        Self::new(ErrorKind::UnknownFact(id))
    }

    /// Creates a not-declared error.
    #[must_use]
    pub fn not_declared(fact: Fact) -> Self {
        Self::new(ErrorKind::NotDeclared(fact))
    }

    /// Creates a duplicate rule error.
    #[must_use]
    pub fn duplicate_rule(name: Name) -> Self {
        Self::new(ErrorKind::DuplicateRule(name))
    }

    /// Creates a duplicate deffacts error.
    #[must_use]
    pub fn duplicate_deffacts(name: Name) -> Self {
        Self::new(ErrorKind::DuplicateDeffacts(name))
    }

    /// Creates an unbound negated variable error.
    #[must_use]
    pub fn unbound_negated_variable(rule: Name, variable: Name) -> Self {
        Self::new(ErrorKind::UnboundNegatedVariable { rule, variable })
    }

    /// Creates an unsupported negation error.
    #[must_use]
    pub fn unsupported_negation(rule: Name) -> Self {
        Self::new(ErrorKind::UnsupportedNegation(rule))
    }

    /// Creates an empty pattern error.
    #[must_use]
    pub fn empty_pattern(rule: Name) -> Self {
        Self::new(ErrorKind::EmptyPattern(rule))
    }

    /// Creates an empty condition error.
    #[must_use]
    pub fn empty_condition(rule: Name) -> Self {
        Self::new(ErrorKind::EmptyCondition(rule))
    }

    /// Creates an empty ruleset error.
    #[must_use]
    pub fn empty_ruleset() -> Self {
        Self::new(ErrorKind::EmptyRuleset)
    }

    /// Creates a run limit exceeded error.
    #[must_use]
    pub fn run_limit_exceeded(limit: usize) -> Self {
        Self::new(ErrorKind::RunLimitExceeded(limit))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A user fact carries an attribute name reserved for engine use.
    #[error("reserved attribute: {0}")]
    ReservedAttribute(Name),

    /// The fact is already present in working memory under the same content.
    #[error("duplicate fact: {0}")]
    DuplicateFact(Fact),

    /// The fact id was never issued or has already been retracted.
    #[error("unknown fact: {0}")]
    UnknownFact(FactId),

    /// No fact with this content is currently declared.
    #[error("fact not declared: {0}")]
    NotDeclared(Fact),

    /// A rule with this name is already registered.
    #[error("duplicate rule: {0}")]
    DuplicateRule(Name),

    /// A deffacts batch with this name is already registered.
    #[error("duplicate deffacts: {0}")]
    DuplicateDeffacts(Name),

    /// A negated variable binding appears before any positive binding of
    /// that variable in the rule.
    #[error("negated binding of {variable} in rule {rule} is never bound positively")]
    UnboundNegatedVariable {
        /// The rule containing the bad binding.
        rule: Name,
        /// The variable that was never positively bound.
        variable: Name,
    },

    /// Negation was applied to something other than a single fact pattern.
    #[error("unsupported negation in rule {0}: negation applies to a single pattern")]
    UnsupportedNegation(Name),

    /// A fact pattern has no slots, so it could never anchor a match.
    #[error("empty pattern in rule {0}")]
    EmptyPattern(Name),

    /// A disjunction has no branches, so it could never hold.
    #[error("empty disjunction in rule {0}")]
    EmptyCondition(Name),

    /// The ruleset has no rules to compile.
    #[error("empty ruleset")]
    EmptyRuleset,

    /// The run loop fired more activations than the configured limit.
    #[error("activation limit exceeded: {0}")]
    RunLimitExceeded(usize),
}
