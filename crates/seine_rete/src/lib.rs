//! Incremental pattern-matching network for the Seine rules engine.
//!
//! Compiles a [`Ruleset`](seine_language::Ruleset) into a shared dataflow
//! graph and keeps the set of satisfied rules current as facts come and
//! go, without rematching from scratch:
//!
//! - **Checks** test one attribute of one fact and are interned so every
//!   rule needing the same test shares one node.
//! - **Test chains** filter single facts, ordered so the most widely
//!   shared checks sit closest to the root.
//! - **Join and negation nodes** combine filtered facts into partial
//!   matches, remembering what each side has seen so a single fact change
//!   touches only the paths it affects.
//! - **Terminals** turn complete matches into activation deltas for the
//!   agenda, and withdraw them when a supporting fact is retracted.
//!
//! The network is built once per ruleset and is immutable afterwards;
//! only node memories change as facts flow.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod activation;
mod alpha;
mod beta;
mod build;
mod check;
mod graph;
mod network;
mod node;
mod token;

pub use activation::{Activation, ActivationDelta};
pub use build::build;
pub use check::{Check, CheckId, CheckOutcome, CheckRegistry};
pub use graph::{GraphEdge, GraphNode, GraphNodeKind, NetworkGraph};
pub use network::{Network, NodeId, Port};
pub use node::JoinTest;
pub use token::{BindKey, Context, FactSet, PartialMatch, Token, Validity};
