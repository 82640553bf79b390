pub mod views;

use chrono::{DateTime, Utc};

use super::comparison::MetricsDelta;
use super::domain::ThresholdPreset;
use super::engine::{DomainError, ThresholdEngine};
use super::perspectives::perspectives;
use views::{MetricsView, PresetView, ThresholdReport};

impl ThresholdReport {
    /// Assemble the full report for one threshold selection.
    ///
    /// The reference threshold for the delta section is clamped into the
    /// table domain; the evaluated threshold itself is not, so out-of-range
    /// selections surface as [`DomainError`].
    pub fn build(
        engine: &ThresholdEngine,
        threshold: f64,
        reference_threshold: f64,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let metrics = engine.metrics_at(threshold)?;
        let reference = engine.metrics_at(engine.clamp_to_domain(reference_threshold))?;

        let scores = engine.scores_for(&metrics);
        let perspectives = perspectives(engine, &metrics)?;
        let delta_vs_reference = MetricsDelta::between(&metrics, &reference);
        let preset = ThresholdPreset::matching(threshold).map(PresetView::from_preset);
        let metrics_view =
            MetricsView::from_metrics(&metrics, engine.table().supplier_population());

        Ok(Self {
            generated_at,
            metrics: metrics_view,
            scores,
            perspectives,
            delta_vs_reference,
            preset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::threshold::table::ReferenceTable;

    #[test]
    fn report_bundles_metrics_scores_and_perspectives() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let report = ThresholdReport::build(&engine, 0.60, 0.60, Utc::now())
            .expect("in-domain threshold");

        assert!(!report.metrics.is_interpolated);
        assert_eq!(report.perspectives.len(), 4);
        assert_eq!(report.delta_vs_reference.flagged, 0);
        assert!(report.preset.is_some());
        assert!(report.scores.balance >= 0.0 && report.scores.balance <= 10.0);
    }

    #[test]
    fn off_grid_threshold_is_marked_interpolated() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let report = ThresholdReport::build(&engine, 0.57, 0.60, Utc::now())
            .expect("in-domain threshold");
        assert!(report.metrics.is_interpolated);
        assert!(report.preset.is_none());
    }

    #[test]
    fn out_of_domain_threshold_fails() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let err = ThresholdReport::build(&engine, 0.80, 0.60, Utc::now())
            .expect_err("threshold outside the table");
        assert!(err.requested > err.max);
    }
}
