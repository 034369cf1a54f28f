//! Rule declarations and named rule collections.

use std::collections::HashMap;
use std::fmt;

use seine_foundation::{Error, Name, Result};

use crate::condition::Condition;

/// A named production: a condition plus scheduling metadata.
///
/// Salience orders activations on the agenda; higher fires first. It
/// defaults to zero, and ties are left to the conflict-resolution
/// strategy.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    name: Name,
    salience: i64,
    condition: Condition,
}

impl Rule {
    /// Creates a rule with the default salience of zero.
    #[must_use]
    pub fn new(name: impl Into<Name>, condition: impl Into<Condition>) -> Self {
        Self {
            name: name.into(),
            salience: 0,
            condition: condition.into(),
        }
    }

    /// Returns a copy of this rule with the salience set.
    #[must_use]
    pub fn with_salience(mut self, salience: i64) -> Self {
        self.salience = salience;
        self
    }

    /// The rule's name.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The rule's salience.
    #[must_use]
    pub fn salience(&self) -> i64 {
        self.salience
    }

    /// The rule's condition.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("salience", &self.salience)
            .field("condition", &self.condition)
            .finish()
    }
}

/// An insertion-ordered collection of uniquely named rules.
#[derive(Clone, Debug, Default)]
pub struct Ruleset {
    rules: Vec<Rule>,
    index: HashMap<Name, usize>,
}

impl Ruleset {
    /// Creates an empty ruleset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DuplicateRule`](seine_foundation::ErrorKind) if
    /// a rule with the same name is already present.
    pub fn add(&mut self, rule: Rule) -> Result<()> {
        if self.index.contains_key(rule.name()) {
            return Err(Error::duplicate_rule(rule.name().clone()));
        }
        self.index.insert(rule.name().clone(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Adds a rule, consuming and returning the ruleset.
    ///
    /// # Errors
    ///
    /// Same as [`Ruleset::add`].
    pub fn with(mut self, rule: Rule) -> Result<Self> {
        self.add(rule)?;
        Ok(self)
    }

    /// Looks a rule up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    /// Iterates over rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the ruleset holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ruleset {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
