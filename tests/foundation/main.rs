//! Integration tests for Layer 0: Foundation
//!
//! Core types: Value, Name, Fact, FactId, and Error.

mod values;
