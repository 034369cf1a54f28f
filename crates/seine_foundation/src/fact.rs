//! Immutable, content-hashed facts.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::value::Value;

/// Attribute name of the marker fact declared on engine reset.
///
/// The `$` prefix is reserved; user facts may not carry attributes with it.
pub const INITIAL_ATTR: &str = "$initial";

/// An immutable fact: a sorted mapping from attribute name to value.
///
/// Facts are identified by content. Two facts with the same attributes and
/// values are the same fact for matching, deduplication, and retraction,
/// regardless of the order attributes were added. Every derived container
/// (sets of facts, token payloads) relies on this content identity.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact {
    attrs: im::OrdMap<Name, Value>,
}

impl Fact {
    /// Creates a fact with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attrs: im::OrdMap::new(),
        }
    }

    /// Returns a copy of this fact with the attribute set.
    ///
    /// Setting an attribute twice keeps the later value.
    #[must_use]
    pub fn with(mut self, attr: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.attrs.insert(attr.into(), value.into());
        self
    }

    /// Creates the marker fact asserted by an engine reset.
    #[must_use]
    pub fn initial() -> Self {
        Self::new().with(INITIAL_ATTR, true)
    }

    /// Returns true if this is the reset marker fact.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.has(INITIAL_ATTR)
    }

    /// Gets an attribute value by name.
    #[must_use]
    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.attrs.get(attr)
    }

    /// Returns true if the attribute is present.
    #[must_use]
    pub fn has(&self, attr: &str) -> bool {
        self.attrs.contains_key(attr)
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns true if the fact has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterates over attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.attrs.iter()
    }

    /// Returns true if any attribute name is reserved for engine use.
    #[must_use]
    pub fn has_reserved_attrs(&self) -> bool {
        self.attrs.keys().any(Name::is_reserved)
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.attrs.iter().eq(other.attrs.iter())
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Sorted iteration makes the hash independent of insertion order.
        self.attrs.len().hash(state);
        for (name, value) in &self.attrs {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl PartialOrd for Fact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.attrs.iter().cmp(other.attrs.iter())
    }
}

impl<N: Into<Name>, V: Into<Value>> FromIterator<(N, V)> for Fact {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |fact, (n, v)| fact.with(n, v))
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.iter() {
            map.entry(&name.as_str(), value);
        }
        map.finish()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, ")")
    }
}

/// Working-memory identifier assigned to a fact when it is declared.
///
/// Ids are strictly increasing within an engine lifetime and are never
/// reused, so a retracted id stays invalid.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactId(u64);

impl FactId {
    /// Creates a fact id from its raw index.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw index of this id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactId({})", self.0)
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<f-{}>", self.0)
    }
}
