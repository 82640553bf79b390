use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::comparison::MetricsDelta;
use super::super::domain::{InterpolatedMetrics, StakeholderScores, ThresholdPreset};
use super::super::perspectives::StakeholderPerspective;

#[derive(Debug, Clone, Serialize)]
pub struct RegionRateView {
    pub region: String,
    pub rate_pct: f64,
    pub sample_size: u32,
    /// True when the cohort is too small for the rate to be reliable.
    pub low_sample: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsView {
    pub threshold: f64,
    pub is_interpolated: bool,
    pub flagged: u32,
    pub flagged_pct: f64,
    pub supplier_population: u32,
    pub annual_cost_millions: f64,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub accuracy_pct: f64,
    pub fairness_spread_pct: f64,
    pub regional_rates: Vec<RegionRateView>,
}

impl MetricsView {
    pub(crate) fn from_metrics(metrics: &InterpolatedMetrics, supplier_population: u32) -> Self {
        let regional_rates = metrics
            .regional_rates
            .iter()
            .map(|(region, stat)| RegionRateView {
                region: region.clone(),
                rate_pct: stat.rate_pct,
                sample_size: stat.sample_size,
                low_sample: stat.is_low_sample(),
            })
            .collect();

        Self {
            threshold: metrics.threshold,
            is_interpolated: metrics.is_interpolated,
            flagged: metrics.flagged,
            flagged_pct: metrics.flagged_pct,
            supplier_population,
            annual_cost_millions: metrics.annual_cost_millions,
            false_positives: metrics.false_positives,
            false_negatives: metrics.false_negatives,
            accuracy_pct: metrics.accuracy_pct,
            fairness_spread_pct: metrics.fairness_spread(),
            regional_rates,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PresetView {
    pub preset: ThresholdPreset,
    pub label: &'static str,
    pub rationale: &'static str,
    pub threshold: f64,
}

impl PresetView {
    pub fn from_preset(preset: ThresholdPreset) -> Self {
        Self {
            preset,
            label: preset.label(),
            rationale: preset.rationale(),
            threshold: preset.threshold(),
        }
    }
}

/// Everything the presentation layer needs for one evaluated threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdReport {
    pub generated_at: DateTime<Utc>,
    pub metrics: MetricsView,
    pub scores: StakeholderScores,
    pub perspectives: Vec<StakeholderPerspective>,
    pub delta_vs_reference: MetricsDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<PresetView>,
}
