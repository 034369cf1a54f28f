//! Checks: single-attribute tests, interned for sharing across rules.

use std::collections::HashMap;
use std::fmt;

use seine_foundation::{Fact, Name, Value};
use seine_language::{Pattern, Slot};

use crate::token::{BindKey, Context};

/// The result of running one check against one fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The fact does not satisfy the check.
    Fail,
    /// The fact satisfies the check and binds nothing.
    Pass,
    /// The fact satisfies the check and binds variables.
    PassWith(Context),
}

/// One attribute-level test compiled from a pattern slot.
///
/// Identity is structural: the same slot on the same attribute compiles
/// to the same check no matter which rule asked for it, which is what
/// lets test chains share nodes. Predicate slots take part through their
/// label, so reuse there is the caller naming two predicates alike.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Check {
    attr: Name,
    slot: Slot,
}

impl Check {
    /// Creates a check for a slot bound to an attribute.
    #[must_use]
    pub fn new(attr: impl Into<Name>, slot: Slot) -> Self {
        Self {
            attr: attr.into(),
            slot,
        }
    }

    /// The attribute the check reads.
    #[must_use]
    pub fn attr(&self) -> &Name {
        &self.attr
    }

    /// The slot the check applies.
    #[must_use]
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Runs the check against a fact.
    ///
    /// A fact without the attribute always fails, whatever the slot; a
    /// negated slot cannot rescue a missing attribute.
    #[must_use]
    pub fn evaluate(&self, fact: &Fact) -> CheckOutcome {
        match fact.get(self.attr.as_str()) {
            None => CheckOutcome::Fail,
            Some(value) => evaluate_slot(&self.slot, value),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attr, self.slot)
    }
}

fn evaluate_slot(slot: &Slot, value: &Value) -> CheckOutcome {
    match slot {
        Slot::Literal(expected) => {
            if value == expected {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail
            }
        }
        Slot::Wildcard => CheckOutcome::Pass,
        Slot::Predicate(predicate) => {
            if predicate.test(value) {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail
            }
        }
        Slot::Bind(name, inner) => match evaluate_slot(inner, value) {
            CheckOutcome::Fail => CheckOutcome::Fail,
            CheckOutcome::Pass => CheckOutcome::PassWith(
                Context::new().with(BindKey::positive(name.clone()), value.clone()),
            ),
            CheckOutcome::PassWith(context) => {
                let capture = Context::new().with(BindKey::positive(name.clone()), value.clone());
                match context.merge(&capture) {
                    Some(merged) => CheckOutcome::PassWith(merged),
                    None => CheckOutcome::Fail,
                }
            }
        },
        // A plain inner test inverts. A capturing inner test keeps
        // passing but flips its bindings; the recorded value becomes one
        // the variable must differ from when contexts later merge.
        Slot::Not(inner) => match evaluate_slot(inner, value) {
            CheckOutcome::Fail => CheckOutcome::Pass,
            CheckOutcome::Pass => CheckOutcome::Fail,
            CheckOutcome::PassWith(context) => CheckOutcome::PassWith(context.inverted()),
        },
        Slot::AllOf(items) => {
            let mut acc: Option<Context> = None;
            for item in items {
                match evaluate_slot(item, value) {
                    CheckOutcome::Fail => return CheckOutcome::Fail,
                    CheckOutcome::Pass => {}
                    CheckOutcome::PassWith(context) => {
                        let merged = match &acc {
                            None => Some(context),
                            Some(existing) => existing.merge(&context),
                        };
                        match merged {
                            Some(merged) => acc = Some(merged),
                            None => return CheckOutcome::Fail,
                        }
                    }
                }
            }
            match acc {
                None => CheckOutcome::Pass,
                Some(context) => CheckOutcome::PassWith(context),
            }
        }
        // First alternative to pass decides the outcome, captures
        // included.
        Slot::AnyOf(items) => {
            for item in items {
                match evaluate_slot(item, value) {
                    CheckOutcome::Fail => {}
                    outcome => return outcome,
                }
            }
            CheckOutcome::Fail
        }
    }
}

/// A handle to an interned check.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckId(u32);

impl CheckId {
    /// The raw index of the check.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckId({})", self.0)
    }
}

/// Interns checks so equal tests share one identity.
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<Check>,
    index: HashMap<Check, CheckId>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a check, returning the existing id for an equal one.
    ///
    /// # Panics
    ///
    /// Panics if the number of interned checks exceeds `u32::MAX`.
    pub fn intern(&mut self, check: Check) -> CheckId {
        if let Some(&id) = self.index.get(&check) {
            return id;
        }
        let id = CheckId(u32::try_from(self.checks.len()).expect("too many interned checks"));
        self.checks.push(check.clone());
        self.index.insert(check, id);
        id
    }

    /// Interns every slot of a pattern, in attribute order.
    ///
    /// # Panics
    ///
    /// Panics if the number of interned checks exceeds `u32::MAX`.
    pub fn intern_pattern(&mut self, pattern: &Pattern) -> Vec<CheckId> {
        pattern
            .iter()
            .map(|(attr, slot)| self.intern(Check::new(attr.clone(), slot.clone())))
            .collect()
    }

    /// Resolves an interned check.
    #[must_use]
    pub fn get(&self, id: CheckId) -> &Check {
        &self.checks[id.index()]
    }

    /// Returns the number of distinct checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true when nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
