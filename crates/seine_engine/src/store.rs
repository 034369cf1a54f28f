//! Insertion-ordered working memory.
//!
//! The store owns the mapping between fact ids and fact content. Ids
//! are handed out in declaration order and never reused, so iterating
//! the store doubles as a declaration history.

use std::collections::{BTreeMap, HashMap};

use seine_foundation::{Error, Fact, FactId, Result};

// =============================================================================
// Fact Store
// =============================================================================

/// Every currently declared fact, in declaration order.
///
/// Content is identity: the store refuses a second copy of a fact
/// already present, and retraction accepts either the id or the
/// content. Ids stay monotonic across [`FactStore::clear`], so a stale
/// id held over a reset can never alias a newer fact.
#[derive(Clone, Debug, Default)]
pub struct FactStore {
    /// Declared facts keyed by id. Ids are monotonic, so map order is
    /// declaration order.
    facts: BTreeMap<FactId, Fact>,
    /// Content index for duplicate detection and retract-by-content.
    by_content: HashMap<Fact, FactId>,
    /// Next id to hand out.
    next_id: u64,
}

impl FactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fact and returns its newly assigned id.
    ///
    /// # Errors
    /// Returns an error if the same content is already present.
    pub fn insert(&mut self, fact: Fact) -> Result<FactId> {
        if self.by_content.contains_key(&fact) {
            return Err(Error::duplicate_fact(fact));
        }
        let id = FactId::new(self.next_id);
        self.next_id += 1;
        self.by_content.insert(fact.clone(), id);
        self.facts.insert(id, fact);
        Ok(id)
    }

    /// Removes a fact by id, returning its content.
    ///
    /// # Errors
    /// Returns an error if the id was never issued or was already
    /// retracted.
    pub fn remove(&mut self, id: FactId) -> Result<Fact> {
        let Some(fact) = self.facts.remove(&id) else {
            return Err(Error::unknown_fact(id));
        };
        self.by_content.remove(&fact);
        Ok(fact)
    }

    /// Removes a fact by content, returning the id it held.
    ///
    /// # Errors
    /// Returns an error if no fact with this content is declared.
    pub fn remove_by_content(&mut self, fact: &Fact) -> Result<FactId> {
        let Some(id) = self.by_content.remove(fact) else {
            return Err(Error::not_declared(fact.clone()));
        };
        self.facts.remove(&id);
        Ok(id)
    }

    /// Returns the content declared under an id.
    #[must_use]
    pub fn get(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    /// Returns the id this content is declared under, if any.
    #[must_use]
    pub fn id_of(&self, fact: &Fact) -> Option<FactId> {
        self.by_content.get(fact).copied()
    }

    /// Returns true if this content is declared.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.by_content.contains_key(fact)
    }

    /// Iterates declared facts in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.facts.iter().map(|(id, fact)| (*id, fact))
    }

    /// Returns the number of declared facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Removes every fact. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.facts.clear();
        self.by_content.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
