//! Seine - Incremental forward-chaining rules engine
//!
//! This crate re-exports all layers of the Seine system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: seine_engine     - Working memory, agenda, run loop
//! Layer 2: seine_rete       - Incremental pattern-matching network
//! Layer 1: seine_language   - Patterns, conditions, rules, normalization
//! Layer 0: seine_foundation - Core types (Value, Fact, Name, Error)
//! ```

pub use seine_engine as engine;
pub use seine_foundation as foundation;
pub use seine_language as language;
pub use seine_rete as rete;
