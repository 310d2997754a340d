//! Deduction aggregation: gross income, taxable income and net pay.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AuditStep, AuditWarning, BracketTable, Contributions};

use super::tax::calculate_withholding_tax;

/// Warning code raised when deductions exceed gross income.
pub const DEDUCTIONS_EXCEED_GROSS: &str = "DEDUCTIONS_EXCEED_GROSS";

/// The combined deduction figures for one calculation.
#[derive(Debug, Clone)]
pub struct DeductionSummary {
    /// Basic salary plus non-taxable allowance.
    pub gross_income: Decimal,
    /// Sum of the three contributions.
    pub total_contributions: Decimal,
    /// Gross income less contributions. May be negative.
    pub taxable_income: Decimal,
    /// Withholding tax on the taxable income.
    pub withholding_tax: Decimal,
    /// Withholding tax plus contributions.
    pub total_deductions: Decimal,
    /// Gross income less all deductions, floored at zero.
    pub net_pay: Decimal,
    /// Audit steps for the tax and net pay derivation.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while aggregating.
    pub warnings: Vec<AuditWarning>,
}

/// Combines income, contributions and withholding tax into net pay.
///
/// Tax is withheld on taxable income whenever gross income is positive, so
/// an allowance counts toward the bracket walk even without a basic salary.
/// Net pay is floored at zero even when deductions exceed gross income, in
/// which case a [`DEDUCTIONS_EXCEED_GROSS`] warning is recorded.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::{aggregate_deductions, calculate_contributions};
/// use budget_engine::models::{BracketTable, ContributionSchedule};
/// use rust_decimal::Decimal;
///
/// let salary = Decimal::from(20000);
/// let contributions = calculate_contributions(salary, &ContributionSchedule::default(), 1);
/// let summary = aggregate_deductions(
///     salary,
///     Decimal::ZERO,
///     contributions.contributions,
///     &BracketTable::default(),
///     4,
/// );
///
/// assert_eq!(summary.taxable_income, Decimal::from(18400));
/// assert_eq!(summary.withholding_tax, Decimal::ZERO);
/// assert_eq!(summary.net_pay, Decimal::from(18400));
/// ```
pub fn aggregate_deductions(
    basic_salary: Decimal,
    non_taxable_allowance: Decimal,
    contributions: Contributions,
    brackets: &BracketTable,
    step_number_start: u32,
) -> DeductionSummary {
    let mut audit_steps = Vec::with_capacity(2);
    let mut warnings = Vec::new();
    let mut step_number = step_number_start;

    let gross_income = basic_salary + non_taxable_allowance;
    let total_contributions = contributions.total();
    let taxable_income = gross_income - total_contributions;

    let withholding_tax = if gross_income > Decimal::ZERO {
        let tax_result = calculate_withholding_tax(taxable_income, brackets, step_number);
        audit_steps.push(tax_result.audit_step);
        tax_result.tax
    } else {
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "withholding_tax".to_string(),
            rule_name: "Withholding Tax".to_string(),
            input: serde_json::json!({
                "taxable_income": taxable_income.normalize().to_string(),
                "gross_income": gross_income.normalize().to_string()
            }),
            output: serde_json::json!({
                "tax": "0"
            }),
            reasoning: "No tax withheld - there is no gross income".to_string(),
        });
        Decimal::ZERO
    };
    step_number += 1;

    let total_deductions = withholding_tax + total_contributions;
    let unfloored_net = gross_income - total_deductions;
    let net_pay = unfloored_net.max(Decimal::ZERO);

    if unfloored_net < Decimal::ZERO {
        warn!(
            gross_income = %gross_income,
            total_deductions = %total_deductions,
            "Deductions exceed gross income, net pay floored at zero"
        );
        warnings.push(AuditWarning {
            code: DEDUCTIONS_EXCEED_GROSS.to_string(),
            message: format!(
                "Deductions of ₱{} exceed gross income of ₱{}; net pay set to ₱0",
                total_deductions.normalize(),
                gross_income.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.normalize().to_string(),
            "withholding_tax": withholding_tax.normalize().to_string(),
            "total_contributions": total_contributions.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.normalize().to_string(),
            "net_pay": net_pay.normalize().to_string()
        }),
        reasoning: format!(
            "₱{} - ₱{} tax - ₱{} contributions = ₱{}",
            gross_income.normalize(),
            withholding_tax.normalize(),
            total_contributions.normalize(),
            net_pay.normalize()
        ),
    });

    DeductionSummary {
        gross_income,
        total_contributions,
        taxable_income,
        withholding_tax,
        total_deductions,
        net_pay,
        audit_steps,
        warnings,
    }
}
