//! Two-stage budget allocation.
//!
//! ## Stages
//!
//! 1. **Fixed** categories take their percentage of *gross income*.
//! 2. Whatever net pay is left after the fixed amounts (floored at zero) is
//!    the **remaining net pay**.
//! 3. **Variable** categories split the remaining net pay by their
//!    percentages renormalized to sum to one.
//!
//! Outside precise mode every amount is rounded to a whole currency unit and
//! the rounding drift of the variable stage is absorbed by the last variable
//! category, so the variable amounts always add up to the remaining net pay.
//! The fixed stage is not reconciled.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::{Allocation, AllocationPlan, AuditStep, AuditWarning};

/// Warning code raised when fixed allocations use up all of net pay.
pub const FIXED_EXCEEDS_NET_PAY: &str = "FIXED_EXCEEDS_NET_PAY";

/// The result of allocating a budget.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    /// Amounts allocated from gross income.
    pub fixed_allocations: Vec<Allocation>,
    /// Sum of the fixed amounts.
    pub fixed_total: Decimal,
    /// Net pay left after fixed allocations, floored at zero.
    pub remaining_net_pay: Decimal,
    /// Amounts allocated from the remaining net pay.
    pub variable_allocations: Vec<Allocation>,
    /// Rounding drift added to the last variable category.
    pub rounding_adjustment: Decimal,
    /// Audit steps for each stage.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while allocating.
    pub warnings: Vec<AuditWarning>,
}

/// Rounds an amount to a whole currency unit, halves away from zero.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::round_to_unit;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to_unit(Decimal::from_str("2428.57").unwrap()), Decimal::from(2429));
/// assert_eq!(round_to_unit(Decimal::from_str("0.5").unwrap()), Decimal::ONE);
/// ```
pub fn round_to_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn amounts_json(allocations: &[Allocation]) -> Value {
    let map: Map<String, Value> = allocations
        .iter()
        .map(|a| {
            (
                a.label.clone(),
                Value::String(a.amount.normalize().to_string()),
            )
        })
        .collect();
    Value::Object(map)
}

/// Allocates gross income and net pay across the plan's categories.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::allocate;
/// use budget_engine::models::AllocationPlan;
/// use rust_decimal::Decimal;
///
/// let result = allocate(
///     Decimal::from(20000),
///     Decimal::from(18400),
///     false,
///     &AllocationPlan::default(),
///     1,
/// );
///
/// assert_eq!(result.fixed_total, Decimal::from(11600));
/// assert_eq!(result.remaining_net_pay, Decimal::from(6800));
/// let variable_sum: Decimal = result.variable_allocations.iter().map(|a| a.amount).sum();
/// assert_eq!(variable_sum, Decimal::from(6800));
/// ```
pub fn allocate(
    gross_income: Decimal,
    net_pay: Decimal,
    precise: bool,
    plan: &AllocationPlan,
    step_number_start: u32,
) -> AllocationResult {
    let mut audit_steps = Vec::with_capacity(4);
    let mut warnings = Vec::new();
    let mut step_number = step_number_start;
    let settle = |amount: Decimal| if precise { amount } else { round_to_unit(amount) };

    // Stage 1: fixed categories on gross income, no reconciliation
    let fixed_allocations: Vec<Allocation> = plan
        .fixed()
        .categories()
        .iter()
        .map(|c| Allocation::new(c.label.clone(), settle(gross_income * c.percentage)))
        .collect();
    let fixed_total: Decimal = fixed_allocations.iter().map(|a| a.amount).sum();

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "fixed_allocation".to_string(),
        rule_name: "Fixed Allocations".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.normalize().to_string(),
            "total_percentage": plan.fixed().total_percentage().normalize().to_string(),
            "precise": precise
        }),
        output: serde_json::json!({
            "allocations": amounts_json(&fixed_allocations),
            "fixed_total": fixed_total.normalize().to_string()
        }),
        reasoning: format!(
            "{} fixed categories take {}% of gross income ₱{}: ₱{}",
            fixed_allocations.len(),
            (plan.fixed().total_percentage() * Decimal::ONE_HUNDRED).normalize(),
            gross_income.normalize(),
            fixed_total.normalize()
        ),
    });
    step_number += 1;

    // Stage 2: remaining net pay
    let remaining_net_pay = (net_pay - fixed_total).max(Decimal::ZERO);
    if net_pay < fixed_total {
        warn!(
            net_pay = %net_pay,
            fixed_total = %fixed_total,
            "Fixed allocations exceed net pay, nothing left for variable categories"
        );
        warnings.push(AuditWarning {
            code: FIXED_EXCEEDS_NET_PAY.to_string(),
            message: format!(
                "Fixed allocations of ₱{} exceed net pay of ₱{}; remaining net pay set to ₱0",
                fixed_total.normalize(),
                net_pay.normalize()
            ),
            severity: "low".to_string(),
        });
    }

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "remaining_net_pay".to_string(),
        rule_name: "Remaining Net Pay".to_string(),
        input: serde_json::json!({
            "net_pay": net_pay.normalize().to_string(),
            "fixed_total": fixed_total.normalize().to_string()
        }),
        output: serde_json::json!({
            "remaining_net_pay": remaining_net_pay.normalize().to_string()
        }),
        reasoning: format!(
            "max(0, ₱{} - ₱{}) = ₱{}",
            net_pay.normalize(),
            fixed_total.normalize(),
            remaining_net_pay.normalize()
        ),
    });
    step_number += 1;

    // Stage 3: variable categories on remaining net pay, renormalized
    let variable_total_percentage = plan.variable().total_percentage();
    let mut variable_allocations: Vec<Allocation> = plan
        .variable()
        .categories()
        .iter()
        .map(|c| {
            let amount = remaining_net_pay * c.percentage / variable_total_percentage;
            Allocation::new(c.label.clone(), settle(amount))
        })
        .collect();

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "variable_allocation".to_string(),
        rule_name: "Variable Allocations".to_string(),
        input: serde_json::json!({
            "remaining_net_pay": remaining_net_pay.normalize().to_string(),
            "total_percentage": variable_total_percentage.normalize().to_string(),
            "precise": precise
        }),
        output: serde_json::json!({
            "allocations": amounts_json(&variable_allocations)
        }),
        reasoning: format!(
            "{} variable categories renormalized from {}% to 100% of ₱{}",
            variable_allocations.len(),
            (variable_total_percentage * Decimal::ONE_HUNDRED).normalize(),
            remaining_net_pay.normalize()
        ),
    });
    step_number += 1;

    // Rounding reconciliation, variable stage only
    let mut rounding_adjustment = Decimal::ZERO;
    if !precise {
        let allocated: Decimal = variable_allocations.iter().map(|a| a.amount).sum();
        let drift = remaining_net_pay - allocated;
        if let Some(last) = variable_allocations.last_mut() {
            if !drift.is_zero() {
                let before = last.amount;
                last.amount += drift;
                rounding_adjustment = drift;

                debug!(
                    category = %last.label,
                    drift = %drift,
                    "Absorbed rounding drift into last variable category"
                );
                audit_steps.push(AuditStep {
                    step_number,
                    rule_id: "rounding_reconciliation".to_string(),
                    rule_name: "Rounding Reconciliation".to_string(),
                    input: serde_json::json!({
                        "remaining_net_pay": remaining_net_pay.normalize().to_string(),
                        "allocated": allocated.normalize().to_string()
                    }),
                    output: serde_json::json!({
                        "category": last.label,
                        "drift": drift.normalize().to_string(),
                        "amount": last.amount.normalize().to_string()
                    }),
                    reasoning: format!(
                        "Rounded amounts total ₱{}; ₱{} drift added to '{}' (₱{} -> ₱{})",
                        allocated.normalize(),
                        drift.normalize(),
                        last.label,
                        before.normalize(),
                        last.amount.normalize()
                    ),
                });
            }
        }
    }

    AllocationResult {
        fixed_allocations,
        fixed_total,
        remaining_net_pay,
        variable_allocations,
        rounding_adjustment,
        audit_steps,
        warnings,
    }
}
