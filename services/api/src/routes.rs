use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use threshold_lab::analysis::threshold::{
    scenario_router, InterpolatedMetrics, ScenarioState, StakeholderScores, THRESHOLD_TOLERANCE,
};

/// Grids beyond this size are rejected rather than silently truncated.
const MAX_SWEEP_POINTS: usize = 500;

#[derive(Debug, Deserialize)]
pub(crate) struct SweepRequest {
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) step: f64,
    /// Overrides the configured reference threshold for score context.
    #[serde(default)]
    pub(crate) reference_threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SweepPoint {
    pub(crate) metrics: InterpolatedMetrics,
    pub(crate) scores: StakeholderScores,
}

#[derive(Debug, Serialize)]
pub(crate) struct SweepResponse {
    pub(crate) reference_threshold: f64,
    pub(crate) points: Vec<SweepPoint>,
}

pub(crate) fn with_scenario_routes(scenario: ScenarioState) -> axum::Router {
    scenario_router(scenario.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/threshold/sweep",
            axum::routing::post(sweep_endpoint),
        )
        .layer(Extension(scenario))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Evaluate an inclusive threshold grid for charting. The whole grid must
/// lie inside the table domain; callers clamp beforehand if they want a
/// partial sweep.
pub(crate) async fn sweep_endpoint(
    Extension(scenario): Extension<ScenarioState>,
    Json(request): Json<SweepRequest>,
) -> Response {
    if !(request.step > 0.0) || request.start > request.end {
        let payload = json!({
            "error": "sweep grid requires start <= end and a positive step",
        });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let expected = ((request.end - request.start) / request.step) as usize + 1;
    if expected > MAX_SWEEP_POINTS {
        let payload = json!({
            "error": format!("sweep grid of {expected} points exceeds the limit of {MAX_SWEEP_POINTS}"),
        });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let mut points = Vec::with_capacity(expected);
    let mut threshold = request.start;
    while threshold <= request.end + THRESHOLD_TOLERANCE {
        match scenario.engine.metrics_at(threshold) {
            Ok(metrics) => {
                let scores = scenario.engine.scores_for(&metrics);
                points.push(SweepPoint { metrics, scores });
            }
            Err(error) => {
                let payload = json!({
                    "error": error.to_string(),
                    "covered_min": error.min,
                    "covered_max": error.max,
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
            }
        }
        threshold += request.step;
    }

    let response = SweepResponse {
        reference_threshold: request
            .reference_threshold
            .unwrap_or(scenario.reference_threshold),
        points,
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use threshold_lab::analysis::threshold::{ReferenceTable, ThresholdEngine};

    fn scenario_state() -> ScenarioState {
        ScenarioState {
            engine: Arc::new(ThresholdEngine::new(ReferenceTable::standard())),
            reference_threshold: 0.60,
        }
    }

    async fn read_json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn sweep_endpoint_walks_the_grid_inclusively() {
        let response = sweep_endpoint(
            Extension(scenario_state()),
            Json(SweepRequest {
                start: 0.50,
                end: 0.70,
                step: 0.05,
                reference_threshold: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let points = payload["points"].as_array().expect("points array");
        assert_eq!(points.len(), 5);
        assert_eq!(points[0]["metrics"]["is_interpolated"], json!(false));
        assert_eq!(payload["reference_threshold"], json!(0.60));
    }

    #[tokio::test]
    async fn sweep_endpoint_rejects_grids_outside_the_domain() {
        let response = sweep_endpoint(
            Extension(scenario_state()),
            Json(SweepRequest {
                start: 0.60,
                end: 0.80,
                step: 0.05,
                reference_threshold: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn sweep_endpoint_rejects_degenerate_grids() {
        let response = sweep_endpoint(
            Extension(scenario_state()),
            Json(SweepRequest {
                start: 0.60,
                end: 0.50,
                step: 0.05,
                reference_threshold: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
