use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::ThresholdPreset;
use super::engine::ThresholdEngine;
use super::report::views::{PresetView, ThresholdReport};

/// Shared router state: the engine plus the configured comparison default.
#[derive(Clone)]
pub struct ScenarioState {
    pub engine: Arc<ThresholdEngine>,
    pub reference_threshold: f64,
}

/// Router builder exposing the threshold evaluation endpoints.
pub fn scenario_router(state: ScenarioState) -> Router {
    Router::new()
        .route("/api/v1/threshold/evaluate", post(evaluate_handler))
        .route("/api/v1/threshold/table", get(table_handler))
        .route("/api/v1/threshold/presets", get(presets_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) threshold: f64,
    /// Overrides the configured reference threshold for the delta section.
    #[serde(default)]
    pub(crate) reference_threshold: Option<f64>,
    /// Clamp out-of-range selections into the table domain instead of
    /// rejecting them.
    #[serde(default)]
    pub(crate) clamp: bool,
}

pub(crate) async fn evaluate_handler(
    State(state): State<ScenarioState>,
    Json(request): Json<EvaluateRequest>,
) -> Response {
    let threshold = if request.clamp {
        state.engine.clamp_to_domain(request.threshold)
    } else {
        request.threshold
    };
    let reference = request
        .reference_threshold
        .unwrap_or(state.reference_threshold);

    match ThresholdReport::build(&state.engine, threshold, reference, Utc::now()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "covered_min": error.min,
                "covered_max": error.max,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn table_handler(State(state): State<ScenarioState>) -> Json<serde_json::Value> {
    let table = state.engine.table();
    let (min, max) = table.domain();
    Json(json!({
        "supplier_population": table.supplier_population(),
        "covered_min": min,
        "covered_max": max,
        "reference_threshold": state.reference_threshold,
        "points": table.points(),
    }))
}

pub(crate) async fn presets_handler() -> Json<Vec<PresetView>> {
    Json(
        ThresholdPreset::ordered()
            .into_iter()
            .map(PresetView::from_preset)
            .collect(),
    )
}
