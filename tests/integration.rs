//! Integration tests for the budget engine HTTP API.
//!
//! This test suite covers:
//! - The reference 20,000 salary budget
//! - Progressive withholding tax across brackets
//! - Contribution floors and ceilings
//! - Rounded and precise allocation
//! - Degenerate incomes and their warnings
//! - Lenient input handling
//! - Error cases and the schedule endpoint

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use budget_engine::api::{AppState, create_router};
use budget_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/ph_monthly").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized as a JSON string.
fn amount(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap_or_else(|| panic!("not a decimal: {}", value)))
}

/// Amounts of an allocation list, in order.
fn amounts(list: &Value) -> Vec<Decimal> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| amount(&a["amount"]))
        .collect()
}

fn allocation(result: &Value, label: &str) -> Decimal {
    result["fixed_allocations"]
        .as_array()
        .unwrap()
        .iter()
        .chain(result["variable_allocations"].as_array().unwrap())
        .find(|a| a["label"] == label)
        .map(|a| amount(&a["amount"]))
        .unwrap_or_else(|| panic!("no allocation labelled {}", label))
}

fn warning_codes(body: &Value) -> Vec<String> {
    body["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_budget(body: Value) -> (StatusCode, Value) {
    send(
        create_router_for_test(),
        Request::builder()
            .method("POST")
            .uri("/budget")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get_schedule(uri: &str) -> (StatusCode, Value) {
    send(
        create_router_for_test(),
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

/// Posts a budget request and returns the `result` object of a 200 response.
async fn budget(basic_salary: Value, allowance: Value, precise: bool) -> Value {
    let (status, body) = post_budget(json!({
        "basic_salary": basic_salary,
        "non_taxable_allowance": allowance,
        "precise": precise,
        "as_of": "2025-08-01"
    }))
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);
    body["result"].clone()
}

// =============================================================================
// SECTION 1: Reference Budget
// =============================================================================

#[tokio::test]
async fn test_reference_budget_deductions() {
    let result = budget(json!(20000), json!(0), false).await;

    assert_eq!(amount(&result["gross_income"]), decimal("20000"));
    assert_eq!(amount(&result["contributions"]["sss"]), decimal("900"));
    assert_eq!(amount(&result["contributions"]["phil_health"]), decimal("500"));
    assert_eq!(amount(&result["contributions"]["pag_ibig"]), decimal("200"));
    assert_eq!(amount(&result["total_contributions"]), decimal("1600"));
    assert_eq!(amount(&result["taxable_income"]), decimal("18400"));
    assert_eq!(amount(&result["withholding_tax"]), Decimal::ZERO);
    assert_eq!(amount(&result["total_deductions"]), decimal("1600"));
    assert_eq!(amount(&result["net_pay"]), decimal("18400"));
}

#[tokio::test]
async fn test_reference_budget_allocations() {
    let result = budget(json!(20000), json!(0), false).await;

    assert_eq!(
        amounts(&result["fixed_allocations"]),
        vec![decimal("4000"), decimal("1600"), decimal("6000")]
    );
    assert_eq!(amount(&result["remaining_net_pay"]), decimal("6800"));
    assert_eq!(
        amounts(&result["variable_allocations"]),
        vec![
            decimal("2429"),
            decimal("1457"),
            decimal("810"),
            decimal("1133"),
            decimal("486"),
            decimal("485"),
        ]
    );
}

#[tokio::test]
async fn test_reference_budget_labels_in_schedule_order() {
    let result = budget(json!(20000), json!(0), false).await;

    let labels: Vec<&str> = result["fixed_allocations"]
        .as_array()
        .unwrap()
        .iter()
        .chain(result["variable_allocations"].as_array().unwrap())
        .map(|a| a["label"].as_str().unwrap())
        .collect();

    assert_eq!(
        labels,
        vec![
            "Housing",
            "Transportation",
            "Savings, Investing, & Debt Payments",
            "Food",
            "Utilities",
            "Insurance",
            "Medical & Healthcare",
            "Personal & Recreation",
            "Miscellaneous",
        ]
    );
}

#[tokio::test]
async fn test_reference_budget_response_envelope() {
    let (status, body) = post_budget(json!({"basic_salary": 20000, "as_of": "2025-08-01"})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["calculation_id"].as_str().is_some());
    assert!(body["timestamp"].as_str().is_some());
    assert_eq!(body["engine_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["schedule_effective_date"], "2023-01-01");
    assert!(warning_codes(&body).is_empty());
}

// =============================================================================
// SECTION 2: Withholding Tax
// =============================================================================

#[tokio::test]
async fn test_second_and_third_bracket_with_allowance() {
    // Contributions 1750 (capped) + 1000 + 200; taxable 47,050
    let result = budget(json!(40000), json!(10000), false).await;

    assert_eq!(amount(&result["gross_income"]), decimal("50000"));
    assert_eq!(amount(&result["contributions"]["sss"]), decimal("1750"));
    assert_eq!(amount(&result["total_contributions"]), decimal("2950"));
    assert_eq!(amount(&result["taxable_income"]), decimal("47050"));
    assert_eq!(amount(&result["withholding_tax"]), decimal("4618.334"));
    assert_eq!(amount(&result["net_pay"]), decimal("42431.666"));
}

#[tokio::test]
async fn test_fourth_bracket_high_earner() {
    let result = budget(json!(100000), json!(0), false).await;

    assert_eq!(amount(&result["contributions"]["phil_health"]), decimal("1600"));
    assert_eq!(amount(&result["taxable_income"]), decimal("96450"));
    assert_eq!(amount(&result["withholding_tax"]), decimal("15987.501"));
    assert_eq!(amount(&result["net_pay"]), decimal("80462.499"));
}

#[tokio::test]
async fn test_allowance_only_income_is_taxed() {
    let result = budget(json!(0), json!(50000), false).await;

    assert_eq!(amount(&result["gross_income"]), decimal("50000"));
    assert_eq!(amount(&result["total_contributions"]), Decimal::ZERO);
    assert_eq!(amount(&result["taxable_income"]), decimal("50000"));
    assert_eq!(amount(&result["withholding_tax"]), decimal("5208.334"));
    assert_eq!(amount(&result["net_pay"]), decimal("44791.666"));
}

// =============================================================================
// SECTION 3: Contribution Floors and Ceilings
// =============================================================================

#[tokio::test]
async fn test_low_salary_raised_to_floors() {
    let result = budget(json!(5000), json!(0), false).await;

    assert_eq!(amount(&result["contributions"]["sss"]), decimal("400"));
    assert_eq!(amount(&result["contributions"]["phil_health"]), decimal("200"));
    assert_eq!(amount(&result["contributions"]["pag_ibig"]), decimal("200"));
    assert_eq!(amount(&result["net_pay"]), decimal("4200"));
}

#[tokio::test]
async fn test_high_salary_capped_at_ceilings() {
    let result = budget(json!(500000), json!(0), false).await;

    assert_eq!(amount(&result["contributions"]["sss"]), decimal("1750"));
    assert_eq!(amount(&result["contributions"]["phil_health"]), decimal("1600"));
    assert_eq!(amount(&result["contributions"]["pag_ibig"]), decimal("200"));
}

// =============================================================================
// SECTION 4: Allocation Modes
// =============================================================================

#[tokio::test]
async fn test_precise_mode_keeps_fractions() {
    let result = budget(json!(20000), json!(0), true).await;

    let food = allocation(&result, "Food");
    assert!(food.fract() > Decimal::ZERO);
    assert!((food - decimal("2428.5714")).abs() < decimal("0.0001"));

    let total: Decimal = amounts(&result["variable_allocations"]).iter().sum();
    assert!((total - decimal("6800")).abs() < decimal("0.000001"));
}

#[tokio::test]
async fn test_rounded_mode_sums_exactly_to_remaining() {
    for salary in [12345, 27500, 61234, 250000] {
        let result = budget(json!(salary), json!(3333), false).await;

        let total: Decimal = amounts(&result["variable_allocations"]).iter().sum();
        assert_eq!(total, amount(&result["remaining_net_pay"]), "salary {}", salary);
    }
}

// =============================================================================
// SECTION 5: Degenerate Incomes
// =============================================================================

#[tokio::test]
async fn test_contributions_exceeding_gross() {
    let (status, body) = post_budget(json!({"basic_salary": 100, "as_of": "2025-08-01"})).await;
    assert_eq!(status, StatusCode::OK);

    let result = &body["result"];
    assert_eq!(amount(&result["taxable_income"]), decimal("-700"));
    assert_eq!(amount(&result["withholding_tax"]), Decimal::ZERO);
    assert_eq!(amount(&result["net_pay"]), Decimal::ZERO);
    assert_eq!(amount(&result["remaining_net_pay"]), Decimal::ZERO);
    assert!(amounts(&result["variable_allocations"]).iter().all(|a| a.is_zero()));
    assert_eq!(
        warning_codes(&body),
        vec!["DEDUCTIONS_EXCEED_GROSS", "FIXED_EXCEEDS_NET_PAY"]
    );
}

#[tokio::test]
async fn test_fixed_categories_exceeding_net_pay() {
    // Net pay 200 cannot cover 580 of fixed categories
    let (status, body) = post_budget(json!({"basic_salary": 1000, "as_of": "2025-08-01"})).await;
    assert_eq!(status, StatusCode::OK);

    let result = &body["result"];
    assert_eq!(amount(&result["net_pay"]), decimal("200"));
    assert_eq!(allocation(result, "Housing"), decimal("200"));
    assert_eq!(amount(&result["remaining_net_pay"]), Decimal::ZERO);
    assert_eq!(warning_codes(&body), vec!["FIXED_EXCEEDS_NET_PAY"]);
}

#[tokio::test]
async fn test_zero_income() {
    let result = budget(json!(0), json!(0), false).await;

    assert_eq!(amount(&result["gross_income"]), Decimal::ZERO);
    assert_eq!(amount(&result["net_pay"]), Decimal::ZERO);
    assert!(amounts(&result["fixed_allocations"]).iter().all(|a| a.is_zero()));
    assert!(amounts(&result["variable_allocations"]).iter().all(|a| a.is_zero()));
}

// =============================================================================
// SECTION 6: Lenient Input
// =============================================================================

#[tokio::test]
async fn test_text_amounts_with_separators() {
    let result = budget(json!("20,000"), json!(" 0 "), false).await;
    assert_eq!(amount(&result["net_pay"]), decimal("18400"));
}

#[tokio::test]
async fn test_negative_and_unparseable_amounts_are_zero() {
    let negative = budget(json!(-20000), json!("abc"), false).await;
    let zero = budget(json!(0), json!(0), false).await;
    assert_eq!(negative, zero);
}

#[tokio::test]
async fn test_huge_amounts_are_clamped() {
    let largest = "79228162514264337593543950335";
    let result = budget(json!(largest), json!(largest), false).await;

    assert_eq!(amount(&result["gross_income"]), decimal("2000000000000000"));
    assert_eq!(amount(&result["withholding_tax"]), decimal("699999999948965.835"));
    assert_eq!(amount(&result["net_pay"]), decimal("1300000000047484.165"));

    let variable: Decimal = amounts(&result["variable_allocations"]).iter().sum();
    assert_eq!(variable, amount(&result["remaining_net_pay"]));
}

#[tokio::test]
async fn test_huge_json_numbers_are_clamped() {
    let result = budget(json!(1e300), json!(7.922816251426434e28), true).await;

    assert_eq!(amount(&result["gross_income"]), decimal("2000000000000000"));
}

#[tokio::test]
async fn test_missing_amounts_default_to_zero() {
    let (status, body) = post_budget(json!({"as_of": "2025-08-01"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["result"]["gross_income"]), Decimal::ZERO);
}

// =============================================================================
// SECTION 7: Audit Trace
// =============================================================================

#[tokio::test]
async fn test_audit_trace_steps_are_numbered_in_order() {
    let (_, body) = post_budget(json!({"basic_salary": 20000, "as_of": "2025-08-01"})).await;

    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps.iter().map(|s| s["rule_id"].as_str().unwrap()).collect();
    assert_eq!(
        rule_ids,
        vec![
            "contribution_sss",
            "contribution_phil_health",
            "contribution_pag_ibig",
            "withholding_tax",
            "net_pay",
            "fixed_allocation",
            "remaining_net_pay",
            "variable_allocation",
            "rounding_reconciliation",
        ]
    );
    for (index, step) in steps.iter().enumerate() {
        assert_eq!(step["step_number"], json!(index + 1));
        assert!(!step["reasoning"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_precise_mode_skips_reconciliation_step() {
    let (_, body) = post_budget(json!({
        "basic_salary": 20000,
        "precise": true,
        "as_of": "2025-08-01"
    }))
    .await;

    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    assert!(steps.iter().all(|s| s["rule_id"] != "rounding_reconciliation"));
}

// =============================================================================
// SECTION 8: Errors and Schedule Lookup
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (status, body) = send(
        create_router_for_test(),
        Request::builder()
            .method("POST")
            .uri("/budget")
            .header("Content-Type", "application/json")
            .body(Body::from("{\"basic_salary\": "))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let (status, body) = send(
        create_router_for_test(),
        Request::builder()
            .method("POST")
            .uri("/budget")
            .body(Body::from(json!({"basic_salary": 20000}).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_CONTENT_TYPE");
}

#[tokio::test]
async fn test_non_boolean_precise_is_validation_error() {
    let (status, body) = post_budget(json!({"basic_salary": 20000, "precise": "yes"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_schedule_date_before_first_version_returns_404() {
    let (status, body) = post_budget(json!({"basic_salary": 20000, "as_of": "2022-12-31"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SCHEDULE_NOT_FOUND");
}

#[tokio::test]
async fn test_schedule_endpoint_defaults_to_today() {
    let (status, body) = get_schedule("/schedule").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "ph_monthly");
    assert_eq!(body["effective_date"], "2023-01-01");

    let brackets = body["schedule"]["brackets"].as_array().unwrap();
    assert_eq!(amount(&brackets[1]["rate"]), decimal("0.15"));
    assert!(brackets[5]["upper_bound"].is_null());

    let sss = &body["schedule"]["contributions"]["sss"];
    assert_eq!(amount(&sss["ceiling"]), decimal("1750"));
}

#[tokio::test]
async fn test_schedule_endpoint_unknown_date_returns_404() {
    let (status, body) = get_schedule("/schedule?as_of=2000-01-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SCHEDULE_NOT_FOUND");
}
