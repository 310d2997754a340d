//! Request types for the budget engine API.
//!
//! Amounts arrive however a form happens to send them: as JSON numbers, as
//! strings with thousands separators, as `null`, or not at all. All of them
//! are accepted and normalized with the same rules as [`parse_amount`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{BudgetInput, parse_amount};

/// Request body for the `POST /budget` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetRequest {
    /// Monthly basic salary, as a number or text.
    #[serde(default)]
    pub basic_salary: Option<Value>,
    /// Monthly non-taxable allowance, as a number or text.
    #[serde(default)]
    pub non_taxable_allowance: Option<Value>,
    /// Keep fractional allocation amounts instead of rounding to whole units.
    #[serde(default)]
    pub precise: bool,
    /// Date used to select the schedule version; defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl BudgetRequest {
    /// Normalizes the request amounts into an engine input.
    pub fn to_input(&self) -> BudgetInput {
        BudgetInput::new(
            self.basic_salary
                .as_ref()
                .map(amount_from_json)
                .unwrap_or_default(),
            self.non_taxable_allowance
                .as_ref()
                .map(amount_from_json)
                .unwrap_or_default(),
            self.precise,
        )
    }
}

/// Converts a JSON value to an amount.
///
/// Numbers and strings are parsed leniently; every other value is zero.
///
/// # Example
///
/// ```
/// use budget_engine::api::amount_from_json;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(amount_from_json(&json!(20000)), Decimal::from(20000));
/// assert_eq!(amount_from_json(&json!("20,000")), Decimal::from(20000));
/// assert_eq!(amount_from_json(&json!(null)), Decimal::ZERO);
/// ```
pub fn amount_from_json(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()),
        Value::String(s) => parse_amount(s),
        _ => Decimal::ZERO,
    }
}

/// Query parameters for the `GET /schedule` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleQuery {
    /// Date used to select the schedule version; defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}
