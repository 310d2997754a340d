//! Budget calculation result models.
//!
//! This module contains the [`BudgetResult`] type returned by the engine and
//! the audit structures that record how each figure was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Allocation, Contributions};

/// The complete monthly budget breakdown.
///
/// All amounts are in the same currency unit as the inputs. Formatting for
/// display is left to the caller.
///
/// # Example
///
/// ```
/// use budget_engine::models::{BudgetResult, Contributions};
/// use rust_decimal::Decimal;
///
/// let empty = BudgetResult {
///     gross_income: Decimal::ZERO,
///     withholding_tax: Decimal::ZERO,
///     contributions: Contributions::default(),
///     total_contributions: Decimal::ZERO,
///     taxable_income: Decimal::ZERO,
///     total_deductions: Decimal::ZERO,
///     net_pay: Decimal::ZERO,
///     fixed_allocations: vec![],
///     remaining_net_pay: Decimal::ZERO,
///     variable_allocations: vec![],
/// };
/// assert_eq!(empty.fixed_total(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResult {
    /// Basic salary plus non-taxable allowance.
    pub gross_income: Decimal,
    /// Progressive withholding tax on taxable income.
    pub withholding_tax: Decimal,
    /// The three mandatory contributions.
    pub contributions: Contributions,
    /// Sum of the three contributions.
    pub total_contributions: Decimal,
    /// Gross income less contributions. May be negative.
    pub taxable_income: Decimal,
    /// Withholding tax plus contributions.
    pub total_deductions: Decimal,
    /// Gross income less all deductions, floored at zero.
    pub net_pay: Decimal,
    /// Allocations taken from gross income.
    pub fixed_allocations: Vec<Allocation>,
    /// Net pay left after fixed allocations, floored at zero.
    pub remaining_net_pay: Decimal,
    /// Allocations of the remaining net pay.
    pub variable_allocations: Vec<Allocation>,
}

impl BudgetResult {
    /// Sum of the fixed allocation amounts.
    pub fn fixed_total(&self) -> Decimal {
        self.fixed_allocations.iter().map(|a| a.amount).sum()
    }

    /// Sum of the variable allocation amounts.
    pub fn variable_total(&self) -> Decimal {
        self.variable_allocations.iter().map(|a| a.amount).sum()
    }

    /// Looks up any allocation by label.
    pub fn allocation(&self, label: &str) -> Option<&Allocation> {
        self.fixed_allocations
            .iter()
            .chain(&self.variable_allocations)
            .find(|a| a.label == label)
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag degenerate situations that the engine resolved by
/// flooring an amount at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// A budget result together with the trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCalculation {
    /// The computed budget.
    pub result: BudgetResult,
    /// How each figure was derived.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_result() -> BudgetResult {
        BudgetResult {
            gross_income: dec("20000"),
            withholding_tax: Decimal::ZERO,
            contributions: Contributions {
                sss: dec("900"),
                phil_health: dec("500"),
                pag_ibig: dec("200"),
            },
            total_contributions: dec("1600"),
            taxable_income: dec("18400"),
            total_deductions: dec("1600"),
            net_pay: dec("18400"),
            fixed_allocations: vec![
                Allocation::new("Housing", dec("4000")),
                Allocation::new("Transportation", dec("1600")),
            ],
            remaining_net_pay: dec("12800"),
            variable_allocations: vec![
                Allocation::new("Food", dec("8000")),
                Allocation::new("Miscellaneous", dec("4800")),
            ],
        }
    }

    #[test]
    fn test_totals_sum_allocations() {
        let result = sample_result();
        assert_eq!(result.fixed_total(), dec("5600"));
        assert_eq!(result.variable_total(), dec("12800"));
    }

    #[test]
    fn test_allocation_lookup_searches_both_stages() {
        let result = sample_result();
        assert_eq!(result.allocation("Housing").unwrap().amount, dec("4000"));
        assert_eq!(result.allocation("Miscellaneous").unwrap().amount, dec("4800"));
        assert!(result.allocation("Unknown").is_none());
    }

    #[test]
    fn test_budget_result_serializes_amounts_as_strings() {
        let json = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(json["gross_income"], "20000");
        assert_eq!(json["contributions"]["phil_health"], "500");
        assert_eq!(json["fixed_allocations"][0]["label"], "Housing");
    }

    #[test]
    fn test_budget_result_round_trips_through_json() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let back: BudgetResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
