//! Pattern elements tested against a single fact attribute.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use seine_foundation::{Name, Value};

/// A pattern element: what one attribute of a fact must look like.
///
/// Slots are structural values. Two slots that compare equal (literals by
/// value, predicates by label, combinators recursively) describe the same
/// test, and the network compiler uses that identity to share one test node
/// between every rule that needs it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Match exactly this value.
    Literal(Value),
    /// Match any present value.
    Wildcard,
    /// Match when the predicate holds for the value.
    Predicate(SlotPredicate),
    /// Invert the inner slot; bindings captured inside flip polarity.
    Not(Box<Slot>),
    /// Every inner slot must match.
    AllOf(Vec<Slot>),
    /// The first matching inner slot wins.
    AnyOf(Vec<Slot>),
    /// Match the inner slot and capture the attribute value under a name.
    Bind(Name, Box<Slot>),
}

impl Slot {
    /// Wraps this slot in a negation.
    #[must_use]
    pub fn negated(self) -> Self {
        Self::Not(Box::new(self))
    }
}

/// Matches this exact value.
#[must_use]
pub fn lit(value: impl Into<Value>) -> Slot {
    Slot::Literal(value.into())
}

/// Matches any present value.
#[must_use]
pub fn wildcard() -> Slot {
    Slot::Wildcard
}

/// Matches when `test` holds for the value.
///
/// The label is the predicate's identity: two predicate slots with the same
/// label are the same test as far as node sharing is concerned, so labels
/// should name the condition (`"adult"`, `"non-empty"`), not the call site.
#[must_use]
pub fn pred(label: impl Into<Name>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Slot {
    Slot::Predicate(SlotPredicate {
        label: label.into(),
        test: Arc::new(test),
    })
}

/// Matches the inner slot and captures the attribute value under `name`.
#[must_use]
pub fn bind(name: impl Into<Name>, slot: Slot) -> Slot {
    Slot::Bind(name.into(), Box::new(slot))
}

/// Matches when every inner slot matches.
#[must_use]
pub fn all_of(slots: impl IntoIterator<Item = Slot>) -> Slot {
    Slot::AllOf(slots.into_iter().collect())
}

/// Matches when any inner slot matches (first match wins).
#[must_use]
pub fn any_of(slots: impl IntoIterator<Item = Slot>) -> Slot {
    Slot::AnyOf(slots.into_iter().collect())
}

/// A labeled predicate over attribute values.
///
/// Identity is the label alone; the closure is opaque.
#[derive(Clone)]
pub struct SlotPredicate {
    label: Name,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl SlotPredicate {
    /// Returns the predicate's label.
    #[must_use]
    pub fn label(&self) -> &Name {
        &self.label
    }

    /// Applies the predicate to a value.
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl PartialEq for SlotPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for SlotPredicate {}

impl Hash for SlotPredicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl fmt::Debug for SlotPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotPredicate({})", self.label)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "={v:?}"),
            Self::Wildcard => write!(f, "*"),
            Self::Predicate(p) => write!(f, "{}()", p.label),
            // Bound wildcards read like variables
            Self::Bind(name, inner) => match inner.as_ref() {
                Self::Wildcard => write!(f, "?{name}"),
                other => write!(f, "?{name}:{other}"),
            },
            Self::Not(inner) => write!(f, "~{inner}"),
            Self::AllOf(slots) => {
                write!(f, "(")?;
                for (i, s) in slots.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, ")")
            }
            Self::AnyOf(slots) => {
                write!(f, "(")?;
                for (i, s) in slots.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// Literal shorthand: `.with("age", 18)` instead of `.with("age", lit(18))`.

impl From<Value> for Slot {
    fn from(v: Value) -> Self {
        Self::Literal(v)
    }
}

impl From<bool> for Slot {
    fn from(b: bool) -> Self {
        Self::Literal(Value::from(b))
    }
}

impl From<i64> for Slot {
    fn from(n: i64) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<i32> for Slot {
    fn from(n: i32) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<f64> for Slot {
    fn from(n: f64) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}
