//! Progressive withholding-tax calculation.
//!
//! The bracket walk taxes every bracket below the taxable income in full,
//! taxes the bracket containing the income up to that income, and stops.

use rust_decimal::Decimal;

use crate::models::{AuditStep, BracketTable};

/// The result of a withholding-tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct WithholdingTaxResult {
    /// The total tax, never negative.
    pub tax: Decimal,
    /// Index of the bracket the walk stopped in.
    pub bracket_index: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn walk_brackets(taxable_income: Decimal, table: &BracketTable) -> (Decimal, usize) {
    let mut total = Decimal::ZERO;
    let mut reached = 0;

    for (index, bracket) in table.brackets().iter().enumerate() {
        reached = index;
        if bracket.contains(taxable_income) {
            total += (taxable_income - bracket.base) * bracket.rate;
            break;
        }
        if let Some(width) = bracket.width() {
            total += width * bracket.rate;
        }
    }

    (total.max(Decimal::ZERO), reached)
}

/// Computes progressive tax on `taxable_income`.
///
/// Negative income lands in the first bracket; the total is clamped at zero
/// so a table whose first bracket carries a non-zero rate still cannot
/// produce negative tax.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::compute_tax;
/// use budget_engine::models::BracketTable;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let table = BracketTable::default();
///
/// // Entirely within the 0% bracket
/// assert_eq!(compute_tax(Decimal::from(18400), &table), Decimal::ZERO);
///
/// // 15% of the excess over 20,833.33
/// assert_eq!(
///     compute_tax(Decimal::from(30000), &table),
///     Decimal::from_str("1375.0005").unwrap()
/// );
/// ```
pub fn compute_tax(taxable_income: Decimal, table: &BracketTable) -> Decimal {
    walk_brackets(taxable_income, table).0
}

/// Computes withholding tax and records an audit step.
pub fn calculate_withholding_tax(
    taxable_income: Decimal,
    table: &BracketTable,
    step_number: u32,
) -> WithholdingTaxResult {
    let (tax, bracket_index) = walk_brackets(taxable_income, table);
    let bracket = &table.brackets()[bracket_index];

    let upper = bracket
        .upper_bound
        .map(|u| u.normalize().to_string())
        .unwrap_or_else(|| "unbounded".to_string());

    let audit_step = AuditStep {
        step_number,
        rule_id: "withholding_tax".to_string(),
        rule_name: "Withholding Tax".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string()
        }),
        output: serde_json::json!({
            "tax": tax.normalize().to_string(),
            "bracket_index": bracket_index,
            "marginal_rate": bracket.rate.normalize().to_string()
        }),
        reasoning: format!(
            "Taxable income ₱{} falls in bracket {} (₱{} to {}) at {}% marginal rate: tax ₱{}",
            taxable_income.normalize(),
            bracket_index + 1,
            bracket.base.normalize(),
            upper,
            (bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            tax.normalize()
        ),
    };

    WithholdingTaxResult {
        tax,
        bracket_index,
        audit_step,
    }
}
