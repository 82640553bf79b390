use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tower::ServiceExt;

use crate::analysis::threshold::router::{evaluate_handler, scenario_router, EvaluateRequest};

#[tokio::test]
async fn evaluate_handler_returns_a_full_report() {
    let state = scenario_state();
    let response = evaluate_handler(
        State(state),
        axum::Json(EvaluateRequest {
            threshold: 0.57,
            reference_threshold: None,
            clamp: false,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["metrics"]["is_interpolated"], json!(true));
    assert_eq!(payload["perspectives"].as_array().map(Vec::len), Some(4));
    assert_eq!(
        payload["delta_vs_reference"]["reference_threshold"],
        json!(0.60)
    );
}

#[tokio::test]
async fn evaluate_handler_rejects_out_of_domain_thresholds() {
    let state = scenario_state();
    let response = evaluate_handler(
        State(state),
        axum::Json(EvaluateRequest {
            threshold: 0.80,
            reference_threshold: None,
            clamp: false,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["covered_max"], json!(0.70));
}

#[tokio::test]
async fn evaluate_handler_clamps_when_asked() {
    let state = scenario_state();
    let response = evaluate_handler(
        State(state),
        axum::Json(EvaluateRequest {
            threshold: 0.90,
            reference_threshold: None,
            clamp: true,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["metrics"]["threshold"], json!(0.70));
    assert_eq!(payload["metrics"]["is_interpolated"], json!(false));
}

#[tokio::test]
async fn evaluate_route_accepts_payloads() {
    let router = scenario_router(scenario_state());

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/threshold/evaluate")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "threshold": 0.60 })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["metrics"]["flagged"], json!(861));
    assert_eq!(payload["preset"]["label"], json!("Balanced (0.60)"));
}

#[tokio::test]
async fn table_and_preset_routes_expose_the_configuration() {
    let router = scenario_router(scenario_state());

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/v1/threshold/table")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["supplier_population"], json!(1000));
    assert_eq!(payload["points"].as_array().map(Vec::len), Some(5));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/threshold/presets")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(3));
}
