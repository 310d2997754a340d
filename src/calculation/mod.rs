//! Calculation logic for the budget engine.
//!
//! This module contains the progressive withholding-tax evaluator, the three
//! clamped contribution formulas, deduction aggregation into net pay, the
//! two-stage allocation with rounding reconciliation, and the
//! [`BudgetCalculator`] that runs them in sequence.

mod allocation;
mod budget;
mod contributions;
mod deductions;
mod tax;

pub use allocation::{AllocationResult, FIXED_EXCEEDS_NET_PAY, allocate, round_to_unit};
pub use budget::BudgetCalculator;
pub use contributions::{
    ContributionsResult, apply_contribution_rule, calculate_contributions,
    pag_ibig_contribution, phil_health_contribution, sss_contribution,
};
pub use deductions::{DEDUCTIONS_EXCEED_GROSS, DeductionSummary, aggregate_deductions};
pub use tax::{WithholdingTaxResult, calculate_withholding_tax, compute_tax};
