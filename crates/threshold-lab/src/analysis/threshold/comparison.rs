use serde::Serialize;

use super::domain::InterpolatedMetrics;

/// Signed change in headline metrics versus a reference threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsDelta {
    pub reference_threshold: f64,
    pub flagged: i64,
    pub flagged_pct: f64,
    pub annual_cost_millions: f64,
    pub false_positives: i64,
    pub false_negatives: i64,
    pub accuracy_pct: f64,
}

impl MetricsDelta {
    pub fn between(current: &InterpolatedMetrics, reference: &InterpolatedMetrics) -> Self {
        Self {
            reference_threshold: reference.threshold,
            flagged: i64::from(current.flagged) - i64::from(reference.flagged),
            flagged_pct: current.flagged_pct - reference.flagged_pct,
            annual_cost_millions: current.annual_cost_millions - reference.annual_cost_millions,
            false_positives: i64::from(current.false_positives)
                - i64::from(reference.false_positives),
            false_negatives: i64::from(current.false_negatives)
                - i64::from(reference.false_negatives),
            accuracy_pct: current.accuracy_pct - reference.accuracy_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::threshold::engine::ThresholdEngine;
    use crate::analysis::threshold::table::ReferenceTable;

    #[test]
    fn delta_against_itself_is_zero() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let metrics = engine.metrics_at(0.60).expect("in-domain threshold");
        let delta = MetricsDelta::between(&metrics, &metrics);
        assert_eq!(delta.flagged, 0);
        assert_eq!(delta.false_negatives, 0);
        assert_eq!(delta.annual_cost_millions, 0.0);
    }

    #[test]
    fn delta_tracks_direction_of_change() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let current = engine.metrics_at(0.50).expect("in-domain threshold");
        let reference = engine.metrics_at(0.60).expect("in-domain threshold");
        let delta = MetricsDelta::between(&current, &reference);
        // Lowering the threshold flags fewer suppliers but misses fewer risks.
        assert!(delta.flagged < 0);
        assert!(delta.annual_cost_millions < 0.0);
        assert!(delta.false_negatives < 0);
    }
}
