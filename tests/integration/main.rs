//! End-to-end tests across every layer, driven through the `seine`
//! facade.

mod disjunction;
