//! HTTP request handlers for the budget engine API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{BudgetRequest, ScheduleQuery};
use super::response::{ApiError, ApiErrorResponse, BudgetResponse, ScheduleResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/budget", post(budget_handler))
        .route("/schedule", get(schedule_handler))
        .with_state(state)
}

fn error_response(error: ApiErrorResponse) -> Response {
    (
        error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error.error),
    )
        .into_response()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Handler for POST /budget.
///
/// Computes a budget against the schedule effective on `as_of` (today when
/// omitted) and returns it with its audit trace.
async fn budget_handler(
    State(state): State<AppState>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing budget request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::validation_error(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return error_response(ApiErrorResponse::bad_request(error));
        }
    };

    let as_of = request.as_of.unwrap_or_else(today);
    let version = match state.config().version_for(as_of) {
        Ok(version) => version,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                as_of = %as_of,
                "Schedule not found"
            );
            return error_response(err.into());
        }
    };

    let start_time = Instant::now();
    let input = request.to_input();
    let calculation = version.calculator().calculate(&input);

    info!(
        correlation_id = %correlation_id,
        schedule = %version.effective_date(),
        net_pay = %calculation.result.net_pay,
        warnings = calculation.audit_trace.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Budget computed successfully"
    );

    let response = BudgetResponse {
        calculation_id: correlation_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        schedule_effective_date: version.effective_date(),
        result: calculation.result,
        audit_trace: calculation.audit_trace,
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(response),
    )
        .into_response()
}

/// Handler for GET /schedule.
///
/// Returns the brackets, contribution rules and categories effective on
/// `as_of` (today when omitted).
async fn schedule_handler(
    State(state): State<AppState>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Invalid schedule query");
            return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
                rejection.body_text(),
            )));
        }
    };

    let as_of = query.as_of.unwrap_or_else(today);
    match state.config().version_for(as_of) {
        Ok(version) => {
            let metadata = state.config().metadata();
            let response = ScheduleResponse {
                code: metadata.code.clone(),
                name: metadata.name.clone(),
                currency: metadata.currency.clone(),
                effective_date: version.effective_date(),
                schedule: version.schedule().clone(),
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(as_of = %as_of, "Schedule not found");
            error_response(err.into())
        }
    }
}
