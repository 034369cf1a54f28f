//! Core types for the Seine rules engine.
//!
//! This crate provides:
//! - [`Value`] - The scalar value type stored in fact attributes
//! - [`Name`] - Shared immutable strings for attribute and variable names
//! - [`Fact`] - Immutable, content-hashed attribute maps
//! - [`FactId`] - Working-memory fact identifiers
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod fact;
mod name;
mod value;

pub use error::{Error, ErrorKind};
pub use fact::{Fact, FactId, INITIAL_ATTR};
pub use name::Name;
pub use value::Value;

/// Result type for all Seine operations.
pub type Result<T> = std::result::Result<T, Error>;
