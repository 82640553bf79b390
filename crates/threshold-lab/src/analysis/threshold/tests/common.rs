use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::analysis::threshold::domain::{ReferencePoint, RegionStat};
use crate::analysis::threshold::engine::ThresholdEngine;
use crate::analysis::threshold::router::ScenarioState;
use crate::analysis::threshold::table::ReferenceTable;

pub(super) fn point(
    threshold: f64,
    flagged: u32,
    flagged_pct: f64,
    cost: f64,
    false_positives: u32,
    false_negatives: u32,
    accuracy_pct: f64,
    rates: &[(&str, f64, u32)],
) -> ReferencePoint {
    let regional_rates: BTreeMap<String, RegionStat> = rates
        .iter()
        .map(|(region, rate_pct, sample_size)| {
            (
                region.to_string(),
                RegionStat {
                    rate_pct: *rate_pct,
                    sample_size: *sample_size,
                },
            )
        })
        .collect();

    ReferencePoint {
        threshold,
        flagged,
        flagged_pct,
        annual_cost_millions: cost,
        false_positives,
        false_negatives,
        accuracy_pct,
        regional_rates,
    }
}

/// Two-point table matching the worked example in the case discussion:
/// flagged 120 -> 90 and cost 2.4 -> 1.8 between thresholds 0.50 and 0.60.
pub(super) fn tiny_table() -> ReferenceTable {
    let points = vec![
        point(
            0.50,
            120,
            12.0,
            2.4,
            30,
            40,
            70.0,
            &[("North", 10.0, 500), ("South", 14.0, 80)],
        ),
        point(
            0.60,
            90,
            9.0,
            1.8,
            20,
            60,
            80.0,
            &[("North", 22.0, 480), ("South", 20.0, 120)],
        ),
    ];
    ReferenceTable::new(points, 1000).expect("tiny table is valid")
}

/// Table whose cost column is flat, for degenerate-range scoring checks.
pub(super) fn flat_cost_table() -> ReferenceTable {
    let points = vec![
        point(0.50, 120, 12.0, 3.0, 30, 40, 70.0, &[("North", 10.0, 500)]),
        point(0.60, 90, 9.0, 3.0, 20, 60, 80.0, &[("North", 22.0, 500)]),
        point(0.70, 60, 6.0, 3.0, 10, 90, 85.0, &[("North", 31.0, 500)]),
    ];
    ReferenceTable::new(points, 1000).expect("flat cost table is valid")
}

pub(super) fn standard_engine() -> ThresholdEngine {
    ThresholdEngine::new(ReferenceTable::standard())
}

pub(super) fn scenario_state() -> ScenarioState {
    ScenarioState {
        engine: Arc::new(standard_engine()),
        reference_threshold: 0.60,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
