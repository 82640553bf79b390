use super::super::domain::{InterpolatedMetrics, StakeholderScores};
use super::super::table::{MetricRange, NormalizationRanges};

const MAX_SCORE: f64 = 10.0;
/// Score returned when a normalization range has zero width.
const NEUTRAL_SCORE: f64 = 5.0;

pub(crate) fn stakeholder_scores(
    metrics: &InterpolatedMetrics,
    ranges: &NormalizationRanges,
) -> StakeholderScores {
    let cfo = descending(metrics.annual_cost_millions, &ranges.annual_cost_millions);
    let cso = descending(metrics.false_negatives as f64, &ranges.false_negatives);
    let supplier_relations = 0.5
        * (descending(metrics.false_positives as f64, &ranges.false_positives)
            + descending(metrics.flagged_pct, &ranges.flagged_pct));
    let fairness = descending(metrics.fairness_spread(), &ranges.fairness_spread);
    let balance = (cfo + cso + supplier_relations + fairness) / 4.0;

    StakeholderScores {
        cfo,
        cso,
        supplier_relations,
        fairness,
        balance,
    }
}

/// Higher metric, lower score: 10 at the table-wide minimum, 0 at the
/// maximum. Falls back to the neutral score when the range is degenerate.
fn descending(value: f64, range: &MetricRange) -> f64 {
    match range.normalized(value) {
        Some(position) => (MAX_SCORE * (1.0 - position)).clamp(0.0, MAX_SCORE),
        None => NEUTRAL_SCORE,
    }
}
