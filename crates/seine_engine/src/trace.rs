//! Ring-buffered trace of engine events.
//!
//! Every observable step the engine takes (fact declared, activation
//! queued, rule fired, reset) is appended here. The buffer keeps the
//! most recent records up to a fixed capacity, so tracing stays cheap
//! even across long runs.

use std::collections::VecDeque;
use std::fmt;

use seine_foundation::{Fact, FactId, Name};

// =============================================================================
// Trace Event
// =============================================================================

/// One observable engine step.
#[derive(Clone, Debug)]
pub enum TraceEvent {
    /// A fact entered working memory.
    FactDeclared {
        /// The id the fact was assigned.
        id: FactId,
        /// The declared content.
        fact: Fact,
    },

    /// A fact left working memory.
    FactRetracted {
        /// The id the fact held.
        id: FactId,
        /// The retracted content.
        fact: Fact,
    },

    /// A rule match became satisfied and was queued on the agenda.
    ActivationAdded {
        /// The rule that matched.
        rule: Name,
    },

    /// A rule match stopped being satisfied and was withdrawn.
    ActivationRemoved {
        /// The rule whose match went away.
        rule: Name,
    },

    /// The run loop fired an activation.
    RuleFired {
        /// The rule that fired.
        rule: Name,
    },

    /// A run loop began.
    RunStarted,

    /// A run loop stopped, with the agenda drained or a limit reached.
    RunFinished {
        /// How many activations the run fired.
        fired: usize,
    },

    /// Working memory, network memories, and the agenda were cleared.
    EngineReset,
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            TraceEvent::FactDeclared { .. } => "fact-declared",
            TraceEvent::FactRetracted { .. } => "fact-retracted",
            TraceEvent::ActivationAdded { .. } => "activation-added",
            TraceEvent::ActivationRemoved { .. } => "activation-removed",
            TraceEvent::RuleFired { .. } => "rule-fired",
            TraceEvent::RunStarted => "run-started",
            TraceEvent::RunFinished { .. } => "run-finished",
            TraceEvent::EngineReset => "engine-reset",
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::FactDeclared { id, fact } => write!(f, "declare {id} {fact}"),
            TraceEvent::FactRetracted { id, fact } => write!(f, "retract {id} {fact}"),
            TraceEvent::ActivationAdded { rule } => write!(f, "activate {rule}"),
            TraceEvent::ActivationRemoved { rule } => write!(f, "deactivate {rule}"),
            TraceEvent::RuleFired { rule } => write!(f, "fire {rule}"),
            TraceEvent::RunStarted => write!(f, "run"),
            TraceEvent::RunFinished { fired } => write!(f, "halt after {fired}"),
            TraceEvent::EngineReset => write!(f, "reset"),
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A traced event with its sequence number.
///
/// Sequence numbers are monotonic for the engine lifetime, so gaps
/// reveal how many records eviction dropped.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    /// Position in the overall event stream.
    pub seq: u64,
    /// The event itself.
    pub event: TraceEvent,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.seq, self.event)
    }
}

// =============================================================================
// Trace Buffer
// =============================================================================

/// Fixed-capacity ring buffer of the most recent trace records.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    /// Records, oldest first.
    records: VecDeque<TraceRecord>,
    /// Maximum number of records to retain.
    max_size: usize,
    /// Next sequence number to assign.
    next_seq: u64,
}

impl TraceBuffer {
    /// Creates a buffer retaining at most `max_size` records.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
            next_seq: 0,
        }
    }

    /// Appends an event, evicting the oldest record when full.
    ///
    /// Returns the sequence number the event was assigned.
    pub fn record(&mut self, event: TraceEvent) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.push_back(TraceRecord { seq, event });
        while self.records.len() > self.max_size {
            self.records.pop_front();
        }
        seq
    }

    /// Returns the number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the retention capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Iterates retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Returns the most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records.iter().skip(start).collect()
    }

    /// Returns retained records of one event type.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|record| record.event.event_type() == event_type)
            .collect()
    }

    /// Drops every retained record. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
