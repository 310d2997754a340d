//! Monthly household budget engine.
//!
//! This crate computes a monthly budget from a basic salary and a
//! non-taxable allowance: the three mandatory contributions, progressive
//! withholding tax, net pay, and a two-stage split of income across budget
//! categories. Schedules are loaded from YAML and versioned by effective date.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
