//! The full rate and category schedule a calculator is configured with.

use serde::Serialize;

use super::{AllocationPlan, BracketTable, ContributionSchedule};

/// Tax brackets, contribution rules and allocation categories.
///
/// Every part is validated when it is built, so a `BudgetSchedule` can
/// always be evaluated without error. `BudgetSchedule::default()` returns
/// the canonical monthly schedule.
///
/// # Example
///
/// ```
/// use budget_engine::models::BudgetSchedule;
///
/// let schedule = BudgetSchedule::default();
/// assert_eq!(schedule.brackets().len(), 6);
/// assert_eq!(schedule.allocation().variable().len(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSchedule {
    brackets: BracketTable,
    contributions: ContributionSchedule,
    allocation: AllocationPlan,
}

impl BudgetSchedule {
    /// Assembles a schedule from validated parts.
    pub fn new(
        brackets: BracketTable,
        contributions: ContributionSchedule,
        allocation: AllocationPlan,
    ) -> Self {
        Self {
            brackets,
            contributions,
            allocation,
        }
    }

    /// The withholding-tax bracket table.
    pub fn brackets(&self) -> &BracketTable {
        &self.brackets
    }

    /// The contribution rules.
    pub fn contributions(&self) -> &ContributionSchedule {
        &self.contributions
    }

    /// The fixed and variable allocation categories.
    pub fn allocation(&self) -> &AllocationPlan {
        &self.allocation
    }
}
