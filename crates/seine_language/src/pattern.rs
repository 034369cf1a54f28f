//! Fact patterns: attribute names mapped to slots.

use std::fmt;
use std::hash::{Hash, Hasher};

use seine_foundation::{INITIAL_ATTR, Name};

use crate::slot::{Slot, lit};

/// A fact pattern: the shape one fact must have.
///
/// A fact matches a pattern when every slot matches the fact's value for
/// that attribute. Attributes of the fact not named by the pattern are
/// ignored. Like facts, patterns are identified by content, which is what
/// lets rules share compiled test chains.
#[derive(Clone, Default)]
pub struct Pattern {
    slots: im::OrdMap<Name, Slot>,
}

impl Pattern {
    /// Creates a pattern with no slots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: im::OrdMap::new(),
        }
    }

    /// Returns a copy of this pattern with the slot set.
    #[must_use]
    pub fn with(mut self, attr: impl Into<Name>, slot: impl Into<Slot>) -> Self {
        self.slots.insert(attr.into(), slot.into());
        self
    }

    /// The pattern matching the marker fact asserted by an engine reset.
    #[must_use]
    pub fn initial() -> Self {
        Self::new().with(INITIAL_ATTR, lit(true))
    }

    /// Gets the slot for an attribute.
    #[must_use]
    pub fn get(&self, attr: &str) -> Option<&Slot> {
        self.slots.get(attr)
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the pattern has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over slots in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Slot)> {
        self.slots.iter()
    }

    /// Returns every variable bound by this pattern with its polarity.
    ///
    /// The flag is true for bindings captured under an odd number of
    /// negations (`~?x`), false for plain captures (`?x`).
    #[must_use]
    pub fn bound_variables(&self) -> Vec<(Name, bool)> {
        let mut vars = Vec::new();
        for (_, slot) in self.iter() {
            collect_binds(slot, false, &mut vars);
        }
        vars
    }
}

fn collect_binds(slot: &Slot, negated: bool, out: &mut Vec<(Name, bool)>) {
    match slot {
        Slot::Bind(name, inner) => {
            out.push((name.clone(), negated));
            collect_binds(inner, negated, out);
        }
        Slot::Not(inner) => collect_binds(inner, !negated, out),
        Slot::AllOf(items) | Slot::AnyOf(items) => {
            for item in items {
                collect_binds(item, negated, out);
            }
        }
        Slot::Literal(_) | Slot::Wildcard | Slot::Predicate(_) => {}
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.slots.iter().eq(other.slots.iter())
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slots.len().hash(state);
        for (name, slot) in &self.slots {
            name.hash(state);
            slot.hash(state);
        }
    }
}

impl<N: Into<Name>, S: Into<Slot>> FromIterator<(N, S)> for Pattern {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |pattern, (n, s)| pattern.with(n, s))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, slot)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {slot}")?;
        }
        write!(f, "}}")
    }
}
