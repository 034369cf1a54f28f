//! The engine: working memory, match network, agenda, and run loop.

use std::fmt;

use seine_foundation::{Error, Fact, FactId, Name, Result};
use seine_language::Ruleset;
use seine_rete::{Activation, ActivationDelta, Network};

use crate::agenda::{Agenda, DepthStrategy, Strategy};
use crate::store::FactStore;
use crate::trace::{TraceBuffer, TraceEvent};

// =============================================================================
// Engine Config
// =============================================================================

/// Tunable knobs for an engine instance.
#[derive(Debug)]
pub struct EngineConfig {
    /// Agenda tie-break strategy.
    strategy: Box<dyn Strategy>,
    /// A single run may fire at most this many activations.
    max_activations: usize,
    /// How many trace records to retain.
    trace_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Box::new(DepthStrategy),
            max_activations: 10_000, // Kill switch
            trace_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the agenda tie-break strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Sets the kill switch threshold.
    #[must_use]
    pub fn with_max_activations(mut self, max: usize) -> Self {
        self.max_activations = max;
        self
    }

    /// Sets how many trace records to retain.
    #[must_use]
    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }
}

// =============================================================================
// Fact Change
// =============================================================================

/// A working-memory change requested by a fired rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactChange {
    /// Declare a new fact.
    Declare(Fact),
    /// Retract a fact by content.
    Retract(Fact),
}

// =============================================================================
// Run Report
// =============================================================================

/// Outcome of a completed run loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    fired: usize,
    declared: usize,
    retracted: usize,
}

impl RunReport {
    /// Number of activations fired before the loop stopped.
    #[must_use]
    pub fn fired(&self) -> usize {
        self.fired
    }

    /// Number of facts handlers declared during the run.
    #[must_use]
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// Number of facts handlers retracted during the run.
    #[must_use]
    pub fn retracted(&self) -> usize {
        self.retracted
    }
}

// =============================================================================
// Engine
// =============================================================================

/// An inference engine: declared facts, the compiled match network, and
/// the agenda of pending activations.
///
/// The engine starts with empty working memory. [`Engine::reset`]
/// declares the initial marker fact plus any registered deffacts, which
/// is what arms rules guarding on the absence of other facts.
pub struct Engine {
    rules: Ruleset,
    network: Network,
    store: FactStore,
    agenda: Agenda,
    deffacts: Vec<(Name, Vec<Fact>)>,
    trace: TraceBuffer,
    max_activations: usize,
}

impl Engine {
    /// Compiles the ruleset and returns an idle engine.
    ///
    /// # Errors
    /// Returns an error if the ruleset is empty or a rule fails
    /// validation.
    pub fn new(rules: Ruleset) -> Result<Self> {
        Self::with_config(rules, EngineConfig::default())
    }

    /// Compiles the ruleset with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the ruleset is empty or a rule fails
    /// validation.
    pub fn with_config(rules: Ruleset, config: EngineConfig) -> Result<Self> {
        let network = seine_rete::build(&rules)?;
        Ok(Self {
            rules,
            network,
            store: FactStore::new(),
            agenda: Agenda::new(config.strategy),
            deffacts: Vec::new(),
            trace: TraceBuffer::new(config.trace_capacity),
            max_activations: config.max_activations,
        })
    }

    /// Declares a fact, propagates it, and updates the agenda.
    ///
    /// # Errors
    /// Returns an error if the fact uses a reserved attribute name or
    /// this content is already declared.
    pub fn declare(&mut self, fact: Fact) -> Result<FactId> {
        check_reserved(&fact)?;
        self.insert(fact)
    }

    /// Retracts a fact by id, withdrawing matches it supported.
    ///
    /// Returns the retracted content.
    ///
    /// # Errors
    /// Returns an error if the id was never issued or was already
    /// retracted.
    pub fn retract(&mut self, id: FactId) -> Result<Fact> {
        let fact = self.store.remove(id)?;
        self.trace.record(TraceEvent::FactRetracted {
            id,
            fact: fact.clone(),
        });
        let deltas = self.network.apply(&[], std::slice::from_ref(&fact));
        self.absorb(&deltas);
        Ok(fact)
    }

    /// Retracts a fact by content, returning the id it held.
    ///
    /// # Errors
    /// Returns an error if no fact with this content is declared.
    pub fn retract_fact(&mut self, fact: &Fact) -> Result<FactId> {
        let id = self.store.remove_by_content(fact)?;
        self.trace.record(TraceEvent::FactRetracted {
            id,
            fact: fact.clone(),
        });
        let deltas = self.network.apply(&[], std::slice::from_ref(fact));
        self.absorb(&deltas);
        Ok(id)
    }

    /// Registers a named batch of facts to declare on every reset.
    ///
    /// # Errors
    /// Returns an error if a batch with this name exists or a fact uses
    /// a reserved attribute name.
    pub fn add_deffacts(&mut self, name: impl Into<Name>, facts: Vec<Fact>) -> Result<()> {
        let name = name.into();
        if self.deffacts.iter().any(|(existing, _)| *existing == name) {
            return Err(Error::duplicate_deffacts(name));
        }
        for fact in &facts {
            check_reserved(fact)?;
        }
        self.deffacts.push((name, facts));
        Ok(())
    }

    /// Clears all runtime state and re-seeds working memory.
    ///
    /// Declares the initial marker fact, then every registered deffacts
    /// batch in registration order. Rules anchored on nothing but the
    /// marker become pending activations immediately.
    ///
    /// # Errors
    /// Returns an error if deffacts batches declare the same content
    /// twice.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear();
        self.network.reset();
        self.agenda.clear();
        self.trace.record(TraceEvent::EngineReset);
        self.insert(Fact::initial())?;
        let seeded: Vec<Fact> = self
            .deffacts
            .iter()
            .flat_map(|(_, facts)| facts.iter().cloned())
            .collect();
        for fact in seeded {
            self.insert(fact)?;
        }
        Ok(())
    }

    /// Fires pending activations until the agenda drains.
    ///
    /// Firings change nothing here; see [`Engine::run_with`] for rules
    /// that feed facts back in.
    ///
    /// # Errors
    /// Returns an error if more activations fire than the kill switch
    /// allows.
    pub fn run(&mut self) -> Result<RunReport> {
        self.run_with(None, |_| Vec::new())
    }

    /// Fires pending activations, letting each firing request
    /// working-memory changes.
    ///
    /// The handler sees each fired activation and returns changes to
    /// apply before the next firing, so rule consequences chain within
    /// one call. Retracting a fact the handler already removed (or
    /// never declared) is a no-op. `limit` caps the firings of this
    /// call; `None` runs to quiescence. The configured kill switch
    /// bounds the loop either way.
    ///
    /// # Errors
    /// Returns an error if more activations fire than the kill switch
    /// allows, or a handler declaration fails (reserved attribute,
    /// duplicate content).
    pub fn run_with<F>(&mut self, limit: Option<usize>, mut handler: F) -> Result<RunReport>
    where
        F: FnMut(&Activation) -> Vec<FactChange>,
    {
        self.trace.record(TraceEvent::RunStarted);
        let mut report = RunReport::default();
        while limit.is_none_or(|steps| report.fired < steps) && !self.agenda.is_empty() {
            if report.fired >= self.max_activations {
                return Err(Error::run_limit_exceeded(self.max_activations));
            }
            let Some(activation) = self.agenda.pop() else {
                break;
            };
            report.fired += 1;
            self.trace.record(TraceEvent::RuleFired {
                rule: activation.rule().clone(),
            });
            for change in handler(&activation) {
                self.apply_change(change, &mut report)?;
            }
        }
        self.trace.record(TraceEvent::RunFinished {
            fired: report.fired,
        });
        Ok(report)
    }

    /// Iterates declared facts in declaration order.
    pub fn facts(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.store.iter()
    }

    /// Returns the agenda of pending activations.
    #[must_use]
    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    /// Returns every currently satisfied rule match, fired or not.
    #[must_use]
    pub fn activations(&self) -> Vec<Activation> {
        self.network.activations()
    }

    /// Returns the compiled match network.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the ruleset this engine was compiled from.
    #[must_use]
    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    /// Returns the trace of recent engine events.
    #[must_use]
    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Inserts without the reserved-name check. Reset uses this path
    /// to declare the marker fact.
    fn insert(&mut self, fact: Fact) -> Result<FactId> {
        let id = self.store.insert(fact.clone())?;
        self.trace.record(TraceEvent::FactDeclared {
            id,
            fact: fact.clone(),
        });
        let deltas = self.network.apply(std::slice::from_ref(&fact), &[]);
        self.absorb(&deltas);
        Ok(id)
    }

    fn apply_change(&mut self, change: FactChange, report: &mut RunReport) -> Result<()> {
        match change {
            FactChange::Declare(fact) => {
                self.declare(fact)?;
                report.declared += 1;
            }
            // A fired rule may ask to retract something another firing
            // already removed; that is not an error.
            FactChange::Retract(fact) => {
                if self.store.contains(&fact) {
                    self.retract_fact(&fact)?;
                    report.retracted += 1;
                }
            }
        }
        Ok(())
    }

    fn absorb(&mut self, deltas: &[ActivationDelta]) {
        for delta in deltas {
            self.trace.record(match delta {
                ActivationDelta::Added(activation) => TraceEvent::ActivationAdded {
                    rule: activation.rule().clone(),
                },
                ActivationDelta::Removed(activation) => TraceEvent::ActivationRemoved {
                    rule: activation.rule().clone(),
                },
            });
        }
        self.agenda.absorb(deltas);
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("rules", &self.rules.len())
            .field("facts", &self.store.len())
            .field("agenda", &self.agenda.len())
            .finish_non_exhaustive()
    }
}

/// Rejects user facts that name reserved attributes.
fn check_reserved(fact: &Fact) -> Result<()> {
    match fact.iter().map(|(name, _)| name).find(|n| n.is_reserved()) {
        Some(reserved) => Err(Error::reserved_attribute(reserved.clone())),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
