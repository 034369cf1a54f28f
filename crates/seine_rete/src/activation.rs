//! Activations: fully satisfied rules awaiting scheduling.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use seine_foundation::{Name, Value};

use crate::token::{Context, FactSet};

/// A complete match of one rule against a set of facts.
///
/// Identity is `(rule, data, context)`; salience rides along for the
/// agenda but two activations differing only in salience cannot exist,
/// since salience is a function of the rule.
#[derive(Clone, Debug)]
pub struct Activation {
    rule: Name,
    salience: i64,
    data: FactSet,
    context: Context,
}

impl Activation {
    /// Creates an activation.
    #[must_use]
    pub fn new(rule: Name, salience: i64, data: FactSet, context: Context) -> Self {
        Self {
            rule,
            salience,
            data,
            context,
        }
    }

    /// The rule that matched.
    #[must_use]
    pub fn rule(&self) -> &Name {
        &self.rule
    }

    /// The matching rule's salience.
    #[must_use]
    pub fn salience(&self) -> i64 {
        self.salience
    }

    /// The facts supporting the match.
    #[must_use]
    pub fn data(&self) -> &FactSet {
        &self.data
    }

    /// The variable bindings of the match.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Looks up a bound variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.context.get(name)
    }

    /// Iterates the bound variables visible to a rule action.
    pub fn bindings(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.context.bindings()
    }

    /// A stable digest of the activation's identity.
    #[must_use]
    pub fn key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Activation {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule && self.data == other.data && self.context == other.context
    }
}

impl Eq for Activation {}

impl Hash for Activation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rule.hash(state);
        self.data.hash(state);
        self.context.hash(state);
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rule, self.data)?;
        if !self.context.is_empty() {
            write!(f, " {}", self.context)?;
        }
        Ok(())
    }
}

/// One change to the set of satisfied rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationDelta {
    /// The activation became satisfied.
    Added(Activation),
    /// The activation stopped being satisfied.
    Removed(Activation),
}

impl ActivationDelta {
    /// The activation the delta concerns.
    #[must_use]
    pub fn activation(&self) -> &Activation {
        match self {
            ActivationDelta::Added(activation) | ActivationDelta::Removed(activation) => activation,
        }
    }

    /// Returns true for newly satisfied matches.
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, ActivationDelta::Added(_))
    }
}

impl fmt::Display for ActivationDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationDelta::Added(activation) => write!(f, "+ {activation}"),
            ActivationDelta::Removed(activation) => write!(f, "- {activation}"),
        }
    }
}
