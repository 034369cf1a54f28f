//! Working memory, agenda, and run loop for the Seine rules engine.
//!
//! This crate provides:
//! - [`Engine`] - Declared facts, the compiled match network, and the run loop
//! - [`FactStore`] - Insertion-ordered working memory
//! - [`Agenda`] - Salience-ordered pending activations with pluggable tie-breaks
//! - [`TraceBuffer`] - Ring-buffered record of recent engine events

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod agenda;
mod engine;
mod store;
mod trace;

pub use agenda::{Agenda, BreadthStrategy, DepthStrategy, RandomStrategy, Strategy};
pub use engine::{Engine, EngineConfig, FactChange, RunReport};
pub use store::FactStore;
pub use trace::{TraceBuffer, TraceEvent, TraceRecord};
