//! HTTP API module for the budget engine.
//!
//! This module provides the REST endpoints for computing a monthly budget
//! and inspecting the schedule in effect on a given date.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BudgetRequest, ScheduleQuery, amount_from_json};
pub use response::{ApiError, ApiErrorResponse, BudgetResponse, ScheduleResponse};
pub use state::AppState;
