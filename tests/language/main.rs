//! Integration tests for Layer 1: Language
//!
//! Patterns, slot predicates, conditions, rules, and the rewrite into
//! normalized branches.

mod conditions;
