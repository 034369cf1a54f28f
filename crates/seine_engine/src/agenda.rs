//! Conflict resolution: the queue of pending activations.
//!
//! Activations enter the agenda as the match network emits deltas and
//! leave when the run loop fires them or a supporting fact goes away.
//! Salience orders the queue; a pluggable strategy breaks ties within
//! one salience band.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use seine_rete::{Activation, ActivationDelta};

// =============================================================================
// Strategy
// =============================================================================

/// Tie-break policy within one salience band.
///
/// The agenda keeps its queue sorted by descending salience and asks
/// the strategy where a newcomer lands among queued activations of
/// equal salience.
pub trait Strategy: fmt::Debug + Send {
    /// Returns the insertion index for `incoming` in `queue`.
    ///
    /// `queue` is sorted by descending salience. Implementations must
    /// return an index inside the salience band of `incoming`, keeping
    /// the sort intact.
    fn place(&mut self, queue: &[Activation], incoming: &Activation) -> usize;
}

/// First index of the salience band. Everything before it outranks
/// `salience`.
fn band_start(queue: &[Activation], salience: i64) -> usize {
    queue.partition_point(|queued| queued.salience() > salience)
}

/// One past the last index of the salience band.
fn band_end(queue: &[Activation], salience: i64) -> usize {
    queue.partition_point(|queued| queued.salience() >= salience)
}

/// Newest first within a salience band.
///
/// Recently derived activations fire before older ones, carrying the
/// engine depth-first into the consequences of the latest change.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthStrategy;

impl Strategy for DepthStrategy {
    fn place(&mut self, queue: &[Activation], incoming: &Activation) -> usize {
        band_start(queue, incoming.salience())
    }
}

/// Oldest first within a salience band.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthStrategy;

impl Strategy for BreadthStrategy {
    fn place(&mut self, queue: &[Activation], incoming: &Activation) -> usize {
        band_end(queue, incoming.salience())
    }
}

/// Uniformly random position within a salience band.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: ChaCha8Rng,
}

impl RandomStrategy {
    /// Creates a strategy seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a strategy that replays the same ordering for a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn place(&mut self, queue: &[Activation], incoming: &Activation) -> usize {
        let start = band_start(queue, incoming.salience());
        let end = band_end(queue, incoming.salience());
        self.rng.gen_range(start..=end)
    }
}

// =============================================================================
// Agenda
// =============================================================================

/// Pending activations, ordered by descending salience with strategy
/// tie-breaks.
///
/// The queue never holds the same activation twice. An addition for an
/// already queued activation is ignored, and a removal for one that is
/// not queued (typically because it already fired) is a no-op.
#[derive(Debug)]
pub struct Agenda {
    queue: Vec<Activation>,
    strategy: Box<dyn Strategy>,
}

impl Default for Agenda {
    fn default() -> Self {
        Self::new(Box::new(DepthStrategy))
    }
}

impl Agenda {
    /// Creates an agenda with the given tie-break strategy.
    #[must_use]
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self {
            queue: Vec::new(),
            strategy,
        }
    }

    /// Applies a batch of activation deltas from the match network.
    pub fn absorb(&mut self, deltas: &[ActivationDelta]) {
        for delta in deltas {
            match delta {
                ActivationDelta::Added(activation) => self.add(activation.clone()),
                ActivationDelta::Removed(activation) => self.remove(activation),
            }
        }
    }

    /// Queues an activation unless an equal one is already queued.
    pub fn add(&mut self, activation: Activation) {
        if self.queue.contains(&activation) {
            return;
        }
        let at = self.strategy.place(&self.queue, &activation);
        self.queue.insert(at, activation);
    }

    /// Drops the queued activation equal to `activation`, if any.
    pub fn remove(&mut self, activation: &Activation) {
        if let Some(at) = self.queue.iter().position(|queued| queued == activation) {
            self.queue.remove(at);
        }
    }

    /// Takes the next activation to fire.
    pub fn pop(&mut self) -> Option<Activation> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    /// Returns the next activation to fire without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Activation> {
        self.queue.first()
    }

    /// Iterates queued activations in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &Activation> {
        self.queue.iter()
    }

    /// Returns the number of queued activations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued activation.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
