//! Mandatory contribution calculation.
//!
//! Each contribution is a flat rate on basic salary, clamped between the
//! rule's floor and ceiling. A non-positive salary contributes nothing.

use rust_decimal::Decimal;

use crate::models::{
    AuditStep, ContributionKind, ContributionRule, ContributionSchedule, Contributions,
};

/// The result of calculating all three contributions.
#[derive(Debug, Clone)]
pub struct ContributionsResult {
    /// The computed amounts.
    pub contributions: Contributions,
    /// One audit step per contribution kind.
    pub audit_steps: Vec<AuditStep>,
}

/// Applies a clamped flat-rate rule to a basic salary.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::apply_contribution_rule;
/// use budget_engine::models::ContributionRule;
/// use rust_decimal::Decimal;
///
/// let rule = ContributionRule::new(Decimal::new(45, 3), Decimal::from(400), Decimal::from(1750));
/// assert_eq!(apply_contribution_rule(Decimal::from(20000), &rule), Decimal::from(900));
/// assert_eq!(apply_contribution_rule(Decimal::from(5000), &rule), Decimal::from(400));
/// assert_eq!(apply_contribution_rule(Decimal::ZERO, &rule), Decimal::ZERO);
/// ```
pub fn apply_contribution_rule(basic_salary: Decimal, rule: &ContributionRule) -> Decimal {
    if basic_salary <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (basic_salary * rule.rate).max(rule.floor).min(rule.ceiling)
}

/// SSS contribution under the default schedule: 4.5% within [400, 1750].
pub fn sss_contribution(basic_salary: Decimal) -> Decimal {
    apply_contribution_rule(basic_salary, &ContributionRule::SSS)
}

/// PhilHealth contribution under the default schedule: 2.5% within [200, 1600].
pub fn phil_health_contribution(basic_salary: Decimal) -> Decimal {
    apply_contribution_rule(basic_salary, &ContributionRule::PHIL_HEALTH)
}

/// PAG-IBIG contribution under the default schedule: 200 for any positive salary.
pub fn pag_ibig_contribution(basic_salary: Decimal) -> Decimal {
    apply_contribution_rule(basic_salary, &ContributionRule::PAG_IBIG)
}

/// Calculates every contribution kind against a schedule.
///
/// Steps are numbered consecutively from `step_number_start` in
/// [`ContributionKind::ALL`] order.
pub fn calculate_contributions(
    basic_salary: Decimal,
    schedule: &ContributionSchedule,
    step_number_start: u32,
) -> ContributionsResult {
    let mut contributions = Contributions::default();
    let mut audit_steps = Vec::with_capacity(ContributionKind::ALL.len());

    for (offset, kind) in ContributionKind::ALL.into_iter().enumerate() {
        let rule = schedule.rule(kind);
        let amount = apply_contribution_rule(basic_salary, rule);

        match kind {
            ContributionKind::Sss => contributions.sss = amount,
            ContributionKind::PhilHealth => contributions.phil_health = amount,
            ContributionKind::PagIbig => contributions.pag_ibig = amount,
        }

        let uncapped = basic_salary * rule.rate;
        let reasoning = if basic_salary <= Decimal::ZERO {
            format!("No {} contribution - basic salary is zero", kind.display_name())
        } else if uncapped < rule.floor {
            format!(
                "₱{} x {} = ₱{} (raised to floor ₱{})",
                basic_salary.normalize(),
                rule.rate.normalize(),
                uncapped.normalize(),
                rule.floor.normalize()
            )
        } else if uncapped > rule.ceiling {
            format!(
                "₱{} x {} = ₱{} (capped at ceiling ₱{})",
                basic_salary.normalize(),
                rule.rate.normalize(),
                uncapped.normalize(),
                rule.ceiling.normalize()
            )
        } else {
            format!(
                "₱{} x {} = ₱{}",
                basic_salary.normalize(),
                rule.rate.normalize(),
                amount.normalize()
            )
        };

        audit_steps.push(AuditStep {
            step_number: step_number_start + offset as u32,
            rule_id: format!("contribution_{}", kind.as_str()),
            rule_name: format!("{} Contribution", kind.display_name()),
            input: serde_json::json!({
                "basic_salary": basic_salary.normalize().to_string(),
                "rate": rule.rate.normalize().to_string(),
                "floor": rule.floor.normalize().to_string(),
                "ceiling": rule.ceiling.normalize().to_string()
            }),
            output: serde_json::json!({
                "amount": amount.normalize().to_string()
            }),
            reasoning,
        });
    }

    ContributionsResult {
        contributions,
        audit_steps,
    }
}
