//! Node behaviors: tests, joins, negations, and terminals.
//!
//! Each node kind is a plain struct owning its memories and exposing a
//! deliver method per input port. Nodes know nothing about the graph;
//! they consume a token, update their state, and return the tokens to
//! forward. The [`Network`](crate::network::Network) owns fan-out.

use std::fmt;
use std::sync::Arc;

use seine_foundation::Name;

use crate::activation::{Activation, ActivationDelta};
use crate::check::{Check, CheckId, CheckOutcome};
use crate::token::{Context, PartialMatch, Token, Validity};

// ============================================================================
// Test nodes
// ============================================================================

/// A single-input node applying one check to one-fact tokens.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TestNode {
    /// The interned check this node applies.
    pub(crate) check: CheckId,
}

impl TestNode {
    /// Applies the check, extending the token's context on capture.
    pub(crate) fn deliver(&self, token: &Token, check: &Check) -> Option<Token> {
        let fact = token.data.iter().next()?;
        match check.evaluate(fact) {
            CheckOutcome::Fail => None,
            CheckOutcome::Pass => Some(token.clone()),
            CheckOutcome::PassWith(captures) => {
                token.context.merge(&captures).map(|context| Token {
                    validity: token.validity,
                    data: token.data.clone(),
                    context,
                })
            }
        }
    }
}

// ============================================================================
// Join nodes
// ============================================================================

/// The pairing function of a join node.
///
/// Given the left and right halves of a candidate pairing it returns the
/// combined context, or `None` to reject the pair. Joins built from a
/// ruleset use [`JoinTest::bindings`], plain binding compatibility; a
/// custom test can refine that with predicates spanning both sides.
#[derive(Clone)]
pub struct JoinTest {
    label: Name,
    test: Arc<dyn Fn(&PartialMatch, &PartialMatch) -> Option<Context> + Send + Sync>,
}

impl JoinTest {
    /// Creates a custom pairing function.
    #[must_use]
    pub fn new(
        label: impl Into<Name>,
        test: impl Fn(&PartialMatch, &PartialMatch) -> Option<Context> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// The standard pairing function: merge the two contexts.
    #[must_use]
    pub fn bindings() -> Self {
        Self::new("bindings", |left: &PartialMatch, right: &PartialMatch| {
            left.context.merge(&right.context)
        })
    }

    /// The test's label.
    #[must_use]
    pub fn label(&self) -> &Name {
        &self.label
    }

    /// Runs the test on a left/right pairing.
    #[must_use]
    pub fn pair(&self, left: &PartialMatch, right: &PartialMatch) -> Option<Context> {
        (self.test)(left, right)
    }
}

impl fmt::Debug for JoinTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JoinTest({})", self.label)
    }
}

/// One side's history at a join node.
///
/// Holds exactly the matches received valid and not yet invalidated.
/// Removal is by value: a withdrawal carries the same data and context
/// as the assertion it cancels.
#[derive(Clone, Debug, Default)]
pub(crate) struct JoinMemory {
    entries: Vec<PartialMatch>,
}

impl JoinMemory {
    pub(crate) fn insert(&mut self, record: PartialMatch) {
        self.entries.push(record);
    }

    pub(crate) fn remove(&mut self, record: &PartialMatch) -> bool {
        match self.entries.iter().position(|entry| entry == record) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PartialMatch> {
        self.entries.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A two-input node pairing the streams of two subchains.
#[derive(Debug)]
pub(crate) struct JoinNode {
    pub(crate) left: JoinMemory,
    pub(crate) right: JoinMemory,
    pub(crate) test: JoinTest,
}

impl JoinNode {
    pub(crate) fn new(test: JoinTest) -> Self {
        Self {
            left: JoinMemory::default(),
            right: JoinMemory::default(),
            test,
        }
    }

    /// Handles a token on the left input.
    ///
    /// The memory update depends on validity, the cross-join does not:
    /// a withdrawal must regenerate the pairings its assertion produced
    /// so downstream state unwinds exactly.
    pub(crate) fn deliver_left(&mut self, token: &Token) -> Vec<Token> {
        let record = token.record();
        match token.validity {
            Validity::Valid => self.left.insert(record.clone()),
            Validity::Invalid => {
                self.left.remove(&record);
            }
        }
        let mut out = Vec::new();
        for right in self.right.iter() {
            if let Some(context) = self.test.pair(&record, right) {
                out.push(Token {
                    validity: token.validity,
                    data: record.data.union(&right.data),
                    context,
                });
            }
        }
        out
    }

    /// Handles a token on the right input, mirroring the left side.
    pub(crate) fn deliver_right(&mut self, token: &Token) -> Vec<Token> {
        let record = token.record();
        match token.validity {
            Validity::Valid => self.right.insert(record.clone()),
            Validity::Invalid => {
                self.right.remove(&record);
            }
        }
        let mut out = Vec::new();
        for left in self.left.iter() {
            if let Some(context) = self.test.pair(left, &record) {
                out.push(Token {
                    validity: token.validity,
                    data: left.data.union(&record.data),
                    context,
                });
            }
        }
        out
    }
}

// ============================================================================
// Negation nodes
// ============================================================================

/// A two-input node gating its left stream on the absence of right
/// matches.
///
/// Each outer match carries a count of compatible monitored matches. The
/// gate flips only on 0 to 1 and 1 to 0 transitions; intermediate counts
/// change nothing downstream. Monitored facts never appear in forwarded
/// tokens, only the outer match passes through.
#[derive(Debug, Default)]
pub(crate) struct NegationNode {
    pub(crate) outer: Vec<(PartialMatch, usize)>,
    pub(crate) monitored: Vec<PartialMatch>,
}

impl NegationNode {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Handles an outer match arriving or leaving.
    pub(crate) fn deliver_left(&mut self, token: &Token) -> Vec<Token> {
        let record = token.record();
        match token.validity {
            Validity::Valid => {
                let count = self
                    .monitored
                    .iter()
                    .filter(|m| record.context.merge(&m.context).is_some())
                    .count();
                self.outer.push((record, count));
                if count == 0 {
                    vec![token.clone()]
                } else {
                    Vec::new()
                }
            }
            Validity::Invalid => {
                let Some(pos) = self.outer.iter().position(|(r, _)| *r == record) else {
                    return Vec::new();
                };
                let (_, count) = self.outer.remove(pos);
                // Downstream saw this match only if its count was zero.
                if count == 0 {
                    vec![token.clone()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Handles a monitored match arriving or leaving.
    pub(crate) fn deliver_right(&mut self, token: &Token) -> Vec<Token> {
        let record = token.record();
        let grew = token.is_valid();
        if grew {
            self.monitored.push(record.clone());
        } else {
            let Some(pos) = self.monitored.iter().position(|m| *m == record) else {
                return Vec::new();
            };
            self.monitored.remove(pos);
        }
        let mut out = Vec::new();
        for (outer, count) in &mut self.outer {
            if outer.context.merge(&record.context).is_none() {
                continue;
            }
            let before = *count;
            *count = if grew {
                before + 1
            } else {
                before.saturating_sub(1)
            };
            match (before, *count) {
                (0, 1) => out.push(Token::invalid(outer.data.clone(), outer.context.clone())),
                (1, 0) => out.push(Token::valid(outer.data.clone(), outer.context.clone())),
                _ => {}
            }
        }
        out
    }
}

// ============================================================================
// Terminal nodes
// ============================================================================

/// The per-rule sink turning complete matches into activation deltas.
///
/// The memory holds each distinct match once, so a rule reached through
/// several branches by the same facts still yields one activation.
/// Deltas queue in arrival order until the network drains them after a
/// batch.
#[derive(Debug)]
pub(crate) struct TerminalNode {
    pub(crate) rule: Name,
    pub(crate) salience: i64,
    pub(crate) memory: Vec<PartialMatch>,
    pub(crate) pending: Vec<ActivationDelta>,
}

impl TerminalNode {
    pub(crate) fn new(rule: Name, salience: i64) -> Self {
        Self {
            rule,
            salience,
            memory: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn deliver(&mut self, token: &Token) {
        let record = token.record();
        match token.validity {
            Validity::Valid => {
                if !self.memory.contains(&record) {
                    let activation = self.activation(&record);
                    self.memory.push(record);
                    self.pending.push(ActivationDelta::Added(activation));
                }
            }
            Validity::Invalid => {
                if let Some(pos) = self.memory.iter().position(|r| *r == record) {
                    self.memory.remove(pos);
                    self.pending
                        .push(ActivationDelta::Removed(self.activation(&record)));
                }
            }
        }
    }

    pub(crate) fn take_pending(&mut self) -> Vec<ActivationDelta> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn activations(&self) -> impl Iterator<Item = Activation> + '_ {
        self.memory.iter().map(|record| self.activation(record))
    }

    fn activation(&self, record: &PartialMatch) -> Activation {
        Activation::new(
            self.rule.clone(),
            self.salience,
            record.data.clone(),
            record.context.clone(),
        )
    }
}
