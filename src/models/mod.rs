//! Core data models for the budget engine.
//!
//! This module contains the schedule tables the engine is configured with,
//! the normalized input snapshot, and the result and audit structures.

mod allocation;
mod budget_input;
mod budget_result;
mod contribution;
mod schedule;
mod tax_bracket;

pub use allocation::{Allocation, AllocationCategory, AllocationPlan, CategoryTable};
pub use budget_input::{BudgetInput, MAX_AMOUNT, amount_from_f64, normalize_amount, parse_amount};
pub use budget_result::{AuditStep, AuditTrace, AuditWarning, BudgetCalculation, BudgetResult};
pub use contribution::{ContributionKind, ContributionRule, ContributionSchedule, Contributions};
pub use schedule::BudgetSchedule;
pub use tax_bracket::{BracketTable, TaxBracket};
