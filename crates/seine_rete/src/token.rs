//! Tokens: the signed units of partial match flowing through the network.

use std::fmt;
use std::hash::{Hash, Hasher};

use seine_foundation::{Fact, Name, Value};

// ============================================================================
// Validity
// ============================================================================

/// The sign of a token.
///
/// A valid token asserts its match; an invalid token withdraws a match
/// asserted earlier. Everything else about the two is compared by value,
/// which is how a withdrawal finds what it cancels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Validity {
    /// The match is being asserted.
    Valid,
    /// The match is being withdrawn.
    Invalid,
}

impl Validity {
    /// Returns true for assertions.
    #[must_use]
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validity::Valid => write!(f, "valid"),
            Validity::Invalid => write!(f, "invalid"),
        }
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// A variable binding key: the variable's name plus its polarity.
///
/// Positive keys record the value a capture bound; negative keys record a
/// value the variable must differ from. Keeping polarity in the key lets
/// one context carry both facets of the same variable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindKey {
    /// The variable name.
    pub name: Name,
    /// True when the binding came from a capture under negation.
    pub negated: bool,
}

impl BindKey {
    /// A positive binding key.
    #[must_use]
    pub fn positive(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            negated: false,
        }
    }

    /// A negative binding key.
    #[must_use]
    pub fn negative(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            negated: true,
        }
    }
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~?{}", self.name)
        } else {
            write!(f, "?{}", self.name)
        }
    }
}

/// Variable bindings accumulated while matching.
///
/// Contexts grow as checks capture values and as joins merge the two
/// sides of a partial match. They are immutable maps: extending one
/// produces a new context, and structural sharing keeps that cheap.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Context {
    bindings: im::OrdMap<BindKey, Value>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: im::OrdMap::new(),
        }
    }

    /// Returns a copy of this context with the binding added.
    #[must_use]
    pub fn with(mut self, key: BindKey, value: impl Into<Value>) -> Self {
        self.bindings.insert(key, value.into());
        self
    }

    /// Looks up the positive binding of a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(&BindKey::positive(name))
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true when no variables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BindKey, &Value)> {
        self.bindings.iter()
    }

    /// Iterates the positive bindings, the view rule actions consume.
    pub fn bindings(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.bindings
            .iter()
            .filter(|(key, _)| !key.negated)
            .map(|(key, value)| (&key.name, value))
    }

    /// Combines two contexts if their bindings are compatible.
    ///
    /// Two bindings of the same key must carry equal values. A positive
    /// and a negative binding of the same name must carry values that
    /// differ, which is what gives a capture under negation its meaning:
    /// the variable may be anything except the value recorded against it.
    #[must_use]
    pub fn merge(&self, other: &Context) -> Option<Context> {
        let mut merged = self.bindings.clone();
        for (key, value) in &other.bindings {
            if let Some(existing) = merged.get(key) {
                if existing != value {
                    return None;
                }
            }
            let opposite = BindKey {
                name: key.name.clone(),
                negated: !key.negated,
            };
            if let Some(existing) = merged.get(&opposite) {
                if existing == value {
                    return None;
                }
            }
            merged.insert(key.clone(), value.clone());
        }
        Some(Context { bindings: merged })
    }

    /// Returns a copy with every binding's polarity flipped.
    #[must_use]
    pub fn inverted(&self) -> Context {
        let mut bindings = im::OrdMap::new();
        for (key, value) in &self.bindings {
            let flipped = BindKey {
                name: key.name.clone(),
                negated: !key.negated,
            };
            bindings.insert(flipped, value.clone());
        }
        Context { bindings }
    }
}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bindings.len().hash(state);
        for (key, value) in &self.bindings {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

// ============================================================================
// Fact sets
// ============================================================================

/// The set of facts supporting a partial match.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    facts: im::OrdSet<Fact>,
}

impl FactSet {
    /// Creates an empty fact set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            facts: im::OrdSet::new(),
        }
    }

    /// Creates a fact set holding one fact.
    #[must_use]
    pub fn singleton(fact: Fact) -> Self {
        let mut facts = im::OrdSet::new();
        facts.insert(fact);
        Self { facts }
    }

    /// Returns the union of two fact sets.
    #[must_use]
    pub fn union(&self, other: &FactSet) -> FactSet {
        Self {
            facts: self.facts.clone().union(other.facts.clone()),
        }
    }

    /// Returns true if the fact is in the set.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    /// Returns the number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true for the empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates over facts in content order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }
}

impl Hash for FactSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.facts.len().hash(state);
        for fact in &self.facts {
            fact.hash(state);
        }
    }
}

impl fmt::Debug for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, fact) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{fact}")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// What node memories store: a match stripped of its sign.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartialMatch {
    /// The facts supporting the match.
    pub data: FactSet,
    /// The bindings the match accumulated.
    pub context: Context,
}

impl PartialMatch {
    /// Creates a partial match.
    #[must_use]
    pub fn new(data: FactSet, context: Context) -> Self {
        Self { data, context }
    }
}

/// A signed partial match in flight.
///
/// Tokens are never edited in place; nodes derive new tokens and forward
/// them. A withdrawal carries the same data and context as the assertion
/// it cancels, differing only in validity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Whether the match is asserted or withdrawn.
    pub validity: Validity,
    /// The facts supporting the match.
    pub data: FactSet,
    /// The bindings the match accumulated.
    pub context: Context,
}

impl Token {
    /// Creates an asserting token.
    #[must_use]
    pub fn valid(data: FactSet, context: Context) -> Self {
        Self {
            validity: Validity::Valid,
            data,
            context,
        }
    }

    /// Creates a withdrawing token.
    #[must_use]
    pub fn invalid(data: FactSet, context: Context) -> Self {
        Self {
            validity: Validity::Invalid,
            data,
            context,
        }
    }

    /// Returns true for assertions.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    /// Projects the token onto what memories store.
    #[must_use]
    pub fn record(&self) -> PartialMatch {
        PartialMatch::new(self.data.clone(), self.context.clone())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {} {}>", self.validity, self.data, self.context)
    }
}
