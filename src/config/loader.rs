//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading budget
//! schedules from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationPlan, BracketTable, BudgetSchedule, CategoryTable, ContributionSchedule,
};

use super::types::{
    BudgetConfig, CategoriesConfig, RateConfig, ScheduleMetadata, ScheduleVersion,
};

/// Loads and provides access to budget schedules.
///
/// # Directory Structure
///
/// ```text
/// config/ph_monthly/
/// ├── schedule.yaml        # Metadata
/// ├── categories.yaml      # Fixed and variable allocation categories
/// └── rates/
///     └── 2023-01-01.yaml  # Tax brackets and contributions effective from this date
/// ```
///
/// Every table is validated while loading; a directory that loads
/// successfully can be evaluated for any input without error.
///
/// # Example
///
/// ```no_run
/// use budget_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/ph_monthly")?;
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let version = loader.version_for(date)?;
/// let result = version.calculator().compute(Decimal::from(20000), Decimal::ZERO, false);
/// println!("Net pay: {}", result.net_pay);
/// # Ok::<(), budget_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BudgetConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing or malformed, if any table
    /// violates its invariants, or if two rate files share an effective date.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ScheduleMetadata>(&path.join("schedule.yaml"))?;

        let categories = Self::load_yaml::<CategoriesConfig>(&path.join("categories.yaml"))?;
        let plan = AllocationPlan::new(
            CategoryTable::fixed(categories.fixed)?,
            CategoryTable::variable(categories.variable)?,
        )?;

        let rates = Self::load_rates(&path.join("rates"))?;
        let mut seen_dates = HashSet::new();
        let mut versions = Vec::with_capacity(rates.len());
        for rate_config in rates {
            if !seen_dates.insert(rate_config.effective_date) {
                return Err(EngineError::invalid_schedule(
                    "rates",
                    format!(
                        "more than one rate file effective on {}",
                        rate_config.effective_date
                    ),
                ));
            }
            versions.push(Self::build_version(rate_config, &plan)?);
        }

        let config = BudgetConfig::new(metadata, versions);
        info!(
            code = %config.metadata().code,
            versions = config.versions().len(),
            "Loaded budget schedules"
        );

        Ok(Self { config })
    }

    /// Validates one rate file against the shared category plan.
    fn build_version(rate_config: RateConfig, plan: &AllocationPlan) -> EngineResult<ScheduleVersion> {
        let brackets = BracketTable::new(rate_config.tax_brackets)?;
        let contributions = ContributionSchedule::new(
            rate_config.contributions.sss,
            rate_config.contributions.phil_health,
            rate_config.contributions.pag_ibig,
        )?;

        debug!(
            effective_date = %rate_config.effective_date,
            brackets = brackets.len(),
            "Validated schedule version"
        );

        Ok(ScheduleVersion::new(
            rate_config.effective_date,
            BudgetSchedule::new(brackets, contributions, plan.clone()),
        ))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateConfig>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                rates.push(Self::load_yaml::<RateConfig>(&path)?);
            }
        }

        if rates.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(rates)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        self.config.metadata()
    }

    /// Gets the schedule version effective on a given date.
    ///
    /// Returns `ScheduleNotFound` if every version takes effect after `date`.
    pub fn version_for(&self, date: NaiveDate) -> EngineResult<&ScheduleVersion> {
        self.config
            .version_for(date)
            .ok_or(EngineError::ScheduleNotFound { date })
    }
}
