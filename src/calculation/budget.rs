//! The budget calculator: contributions, tax, net pay and allocation in one pass.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AuditTrace, BudgetCalculation, BudgetInput, BudgetResult, BudgetSchedule};

use super::allocation::allocate;
use super::contributions::calculate_contributions;
use super::deductions::aggregate_deductions;

/// Computes monthly budgets against a fixed schedule.
///
/// The calculator holds no mutable state; each call is a pure function of its
/// input and the schedule, so a single instance can be shared across threads.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::BudgetCalculator;
/// use rust_decimal::Decimal;
///
/// let calculator = BudgetCalculator::default();
/// let result = calculator.compute(Decimal::from(20000), Decimal::ZERO, false);
///
/// assert_eq!(result.net_pay, Decimal::from(18400));
/// assert_eq!(result.remaining_net_pay, Decimal::from(6800));
/// assert_eq!(result.variable_total(), Decimal::from(6800));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BudgetCalculator {
    schedule: Arc<BudgetSchedule>,
}

impl BudgetCalculator {
    /// Creates a calculator for a schedule.
    pub fn new(schedule: BudgetSchedule) -> Self {
        Self {
            schedule: Arc::new(schedule),
        }
    }

    /// The schedule this calculator evaluates against.
    pub fn schedule(&self) -> &BudgetSchedule {
        &self.schedule
    }

    /// Computes a budget from raw amounts.
    ///
    /// Amounts are clamped the same way as [`BudgetInput::new`].
    pub fn compute(
        &self,
        basic_salary: Decimal,
        non_taxable_allowance: Decimal,
        precise: bool,
    ) -> BudgetResult {
        self.calculate(&BudgetInput::new(basic_salary, non_taxable_allowance, precise))
            .result
    }

    /// Computes a budget and the audit trace explaining it.
    pub fn calculate(&self, input: &BudgetInput) -> BudgetCalculation {
        let schedule = &self.schedule;
        let mut steps = Vec::new();
        let mut warnings = Vec::new();
        let mut step_number: u32 = 1;

        let contributions = calculate_contributions(
            input.basic_salary(),
            schedule.contributions(),
            step_number,
        );
        step_number += contributions.audit_steps.len() as u32;
        steps.extend(contributions.audit_steps);

        let deductions = aggregate_deductions(
            input.basic_salary(),
            input.non_taxable_allowance(),
            contributions.contributions,
            schedule.brackets(),
            step_number,
        );
        step_number += deductions.audit_steps.len() as u32;
        steps.extend(deductions.audit_steps);
        warnings.extend(deductions.warnings);

        let allocation = allocate(
            deductions.gross_income,
            deductions.net_pay,
            input.precise(),
            schedule.allocation(),
            step_number,
        );
        steps.extend(allocation.audit_steps);
        warnings.extend(allocation.warnings);

        debug!(
            gross_income = %deductions.gross_income,
            net_pay = %deductions.net_pay,
            remaining_net_pay = %allocation.remaining_net_pay,
            precise = input.precise(),
            "Budget computed"
        );

        BudgetCalculation {
            result: BudgetResult {
                gross_income: deductions.gross_income,
                withholding_tax: deductions.withholding_tax,
                contributions: contributions.contributions,
                total_contributions: deductions.total_contributions,
                taxable_income: deductions.taxable_income,
                total_deductions: deductions.total_deductions,
                net_pay: deductions.net_pay,
                fixed_allocations: allocation.fixed_allocations,
                remaining_net_pay: allocation.remaining_net_pay,
                variable_allocations: allocation.variable_allocations,
            },
            audit_trace: AuditTrace { steps, warnings },
        }
    }
}
