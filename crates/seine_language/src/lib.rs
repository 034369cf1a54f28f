//! Rule-authoring surface for the Seine rules engine.
//!
//! This crate provides:
//! - [`Slot`] - Pattern elements tested against one fact attribute
//! - [`Pattern`] - Fact patterns mapping attribute names to slots
//! - [`Condition`] - And/Or/Not trees over patterns
//! - [`Rule`] and [`Ruleset`] - Named, salienced rules
//! - [`normalize`] - Disjunctive-normal-form expansion of condition trees
//! - [`validate`] - Compile-time rejection of malformed rules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod condition;
mod normalize;
mod pattern;
mod rule;
mod slot;
mod validate;

pub use condition::{Condition, all, any, none};
pub use normalize::{Branch, BranchElement, normalize};
pub use pattern::Pattern;
pub use rule::{Rule, Ruleset};
pub use slot::{Slot, SlotPredicate, all_of, any_of, bind, lit, pred, wildcard};
pub use validate::validate;
