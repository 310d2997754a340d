//! Configuration loading for budget schedules.
//!
//! This module loads tax brackets, contribution rules and allocation
//! categories from YAML files and validates them into
//! [`BudgetSchedule`](crate::models::BudgetSchedule) versions keyed by
//! effective date.
//!
//! # Example
//!
//! ```no_run
//! use budget_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ph_monthly").unwrap();
//! println!("Loaded schedule: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BudgetConfig, CategoriesConfig, ContributionsConfig, RateConfig, ScheduleMetadata,
    ScheduleVersion,
};
