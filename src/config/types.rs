//! Configuration types for budget schedules.
//!
//! This module contains the structures deserialized from the YAML
//! configuration files and the validated [`BudgetConfig`] they are turned
//! into.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::BudgetCalculator;
use crate::models::{AllocationCategory, BudgetSchedule, ContributionRule, TaxBracket};

/// Metadata about the schedule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Short identifier (e.g., "ph_monthly").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// ISO 4217 currency code all amounts are expressed in.
    pub currency: String,
    /// URL to the published withholding and contribution tables.
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Categories file structure (categories.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesConfig {
    /// Categories applied to gross income.
    #[serde(default)]
    pub fixed: Vec<AllocationCategory>,
    /// Categories applied to the remaining net pay.
    pub variable: Vec<AllocationCategory>,
}

/// Contribution rules section of a rate file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsConfig {
    /// SSS rule.
    pub sss: ContributionRule,
    /// PhilHealth rule.
    pub phil_health: ContributionRule,
    /// PAG-IBIG rule.
    pub pag_ibig: ContributionRule,
}

/// Rate file structure (rates/<effective-date>.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    /// The date from which these rates apply.
    pub effective_date: NaiveDate,
    /// Withholding-tax brackets in ascending order.
    pub tax_brackets: Vec<TaxBracket>,
    /// Contribution rules.
    pub contributions: ContributionsConfig,
}

/// A validated schedule and the date it takes effect.
#[derive(Debug, Clone)]
pub struct ScheduleVersion {
    effective_date: NaiveDate,
    calculator: BudgetCalculator,
}

impl ScheduleVersion {
    /// Creates a version from a validated schedule.
    pub fn new(effective_date: NaiveDate, schedule: BudgetSchedule) -> Self {
        Self {
            effective_date,
            calculator: BudgetCalculator::new(schedule),
        }
    }

    /// The date from which this version applies.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// The schedule tables.
    pub fn schedule(&self) -> &BudgetSchedule {
        self.calculator.schedule()
    }

    /// A calculator bound to this schedule.
    pub fn calculator(&self) -> &BudgetCalculator {
        &self.calculator
    }
}

/// The complete configuration loaded from a schedule directory.
#[derive(Debug, Clone)]
pub struct BudgetConfig {
    metadata: ScheduleMetadata,
    /// Versions sorted oldest first.
    versions: Vec<ScheduleVersion>,
}

impl BudgetConfig {
    /// Creates a BudgetConfig, sorting versions by effective date.
    pub fn new(metadata: ScheduleMetadata, versions: Vec<ScheduleVersion>) -> Self {
        let mut sorted = versions;
        sorted.sort_by_key(|v| v.effective_date());
        Self {
            metadata,
            versions: sorted,
        }
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns all versions, oldest first.
    pub fn versions(&self) -> &[ScheduleVersion] {
        &self.versions
    }

    /// Returns the most recent version effective on or before `date`.
    pub fn version_for(&self, date: NaiveDate) -> Option<&ScheduleVersion> {
        self.versions.iter().rfind(|v| v.effective_date() <= date)
    }
}
