//! Budget allocation categories.
//!
//! Fixed categories take a share of gross income directly. Variable
//! categories split whatever net pay remains after the fixed allocations,
//! with their percentages renormalized among themselves.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A named budget category and its percentage weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationCategory {
    /// Display label, unique across the allocation plan.
    pub label: String,
    /// Weight in `(0, 1]`.
    pub percentage: Decimal,
}

impl AllocationCategory {
    /// Creates a category.
    pub fn new(label: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            label: label.into(),
            percentage,
        }
    }
}

/// A computed allocation amount for one category.
///
/// # Example
///
/// ```
/// use budget_engine::models::Allocation;
/// use rust_decimal::Decimal;
///
/// let housing = Allocation::new("Housing", Decimal::from(4000));
/// assert_eq!(housing.label, "Housing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The category label.
    pub label: String,
    /// The amount allocated to the category.
    pub amount: Decimal,
}

impl Allocation {
    /// Creates an allocation.
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// An ordered, validated list of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: Vec<AllocationCategory>,
}

impl CategoryTable {
    fn validate_entries(table: &str, categories: &[AllocationCategory]) -> EngineResult<()> {
        for category in categories {
            if category.label.trim().is_empty() {
                return Err(EngineError::invalid_schedule(table, "category label is empty"));
            }
            if category.percentage <= Decimal::ZERO || category.percentage > Decimal::ONE {
                return Err(EngineError::invalid_schedule(
                    table,
                    format!(
                        "category '{}' has percentage {} outside (0, 1]",
                        category.label, category.percentage
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Builds the fixed (gross-income) table.
    ///
    /// The table may be empty, but its percentages must not add up to more
    /// than the whole of gross income.
    pub fn fixed(categories: Vec<AllocationCategory>) -> EngineResult<Self> {
        const TABLE: &str = "fixed_categories";
        Self::validate_entries(TABLE, &categories)?;

        let table = Self { categories };
        if table.total_percentage() > Decimal::ONE {
            return Err(EngineError::invalid_schedule(
                TABLE,
                format!(
                    "percentages sum to {}, more than all of gross income",
                    table.total_percentage()
                ),
            ));
        }
        Ok(table)
    }

    /// Builds the variable (remaining net pay) table.
    ///
    /// The table must be non-empty with a positive percentage sum, since the
    /// percentages are renormalized by that sum.
    pub fn variable(categories: Vec<AllocationCategory>) -> EngineResult<Self> {
        const TABLE: &str = "variable_categories";
        if categories.is_empty() {
            return Err(EngineError::invalid_schedule(
                TABLE,
                "at least one variable category is required",
            ));
        }
        Self::validate_entries(TABLE, &categories)?;

        let table = Self { categories };
        if table.total_percentage() <= Decimal::ZERO {
            return Err(EngineError::invalid_schedule(TABLE, "percentages sum to zero"));
        }
        Ok(table)
    }

    /// Returns the categories in order.
    pub fn categories(&self) -> &[AllocationCategory] {
        &self.categories
    }

    /// Sum of the raw percentages.
    pub fn total_percentage(&self) -> Decimal {
        self.categories.iter().map(|c| c.percentage).sum()
    }

    /// Returns the number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if the table has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The pair of fixed and variable category tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    fixed: CategoryTable,
    variable: CategoryTable,
}

impl AllocationPlan {
    /// Combines the two tables, rejecting labels that appear more than once.
    pub fn new(fixed: CategoryTable, variable: CategoryTable) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for category in fixed.categories().iter().chain(variable.categories()) {
            if !seen.insert(category.label.as_str()) {
                return Err(EngineError::invalid_schedule(
                    "categories",
                    format!("duplicate category label '{}'", category.label),
                ));
            }
        }
        Ok(Self { fixed, variable })
    }

    /// Categories applied to gross income.
    pub fn fixed(&self) -> &CategoryTable {
        &self.fixed
    }

    /// Categories applied to the net pay left after fixed allocations.
    pub fn variable(&self) -> &CategoryTable {
        &self.variable
    }
}

impl Default for AllocationPlan {
    fn default() -> Self {
        let fixed = vec![
            AllocationCategory::new("Housing", Decimal::new(20, 2)),
            AllocationCategory::new("Transportation", Decimal::new(8, 2)),
            AllocationCategory::new("Savings, Investing, & Debt Payments", Decimal::new(30, 2)),
        ];
        let variable = vec![
            AllocationCategory::new("Food", Decimal::new(15, 2)),
            AllocationCategory::new("Utilities", Decimal::new(9, 2)),
            AllocationCategory::new("Insurance", Decimal::new(5, 2)),
            AllocationCategory::new("Medical & Healthcare", Decimal::new(7, 2)),
            AllocationCategory::new("Personal & Recreation", Decimal::new(3, 2)),
            AllocationCategory::new("Miscellaneous", Decimal::new(3, 2)),
        ];

        Self {
            fixed: CategoryTable {
                categories: fixed,
            },
            variable: CategoryTable {
                categories: variable,
            },
        }
    }
}
