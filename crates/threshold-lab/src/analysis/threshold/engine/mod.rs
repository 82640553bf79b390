mod interpolate;
mod scores;

use std::collections::BTreeMap;

use interpolate::{bracket, fraction, lerp, round_count, Bracket};

use super::domain::{InterpolatedMetrics, ReferencePoint, RegionStat, StakeholderScores};
use super::table::ReferenceTable;

/// Stateless interpolation and scoring engine over a validated reference
/// table.
///
/// Every call is an independent pure computation; identical inputs yield
/// bit-identical outputs, and the engine holds no mutable state, so
/// concurrent callers need no coordination.
pub struct ThresholdEngine {
    table: ReferenceTable,
}

impl ThresholdEngine {
    pub fn new(table: ReferenceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Complete metric set at `threshold`.
    ///
    /// Thresholds matching a table entry within tolerance return that
    /// entry's values verbatim; strictly interior thresholds interpolate
    /// linearly between the bracketing entries. Out-of-domain thresholds
    /// fail; the engine never extrapolates or clamps on its own.
    pub fn metrics_at(&self, threshold: f64) -> Result<InterpolatedMetrics, DomainError> {
        match bracket(self.table.points(), threshold) {
            Some(Bracket::Exact(point)) => Ok(exact_metrics(point)),
            Some(Bracket::Between { lo, hi }) => Ok(interpolated_metrics(threshold, lo, hi)),
            None => {
                let (min, max) = self.table.domain();
                Err(DomainError {
                    requested: threshold,
                    min,
                    max,
                })
            }
        }
    }

    /// Stakeholder scores for a metric set, normalized against the
    /// table-wide ranges so selections within one session are comparable.
    pub fn scores_for(&self, metrics: &InterpolatedMetrics) -> StakeholderScores {
        scores::stakeholder_scores(metrics, self.table.ranges())
    }

    /// Clamp a requested threshold into the covered domain. Clamping is a
    /// caller-side policy; `metrics_at` itself rejects out-of-domain input.
    pub fn clamp_to_domain(&self, threshold: f64) -> f64 {
        let (min, max) = self.table.domain();
        threshold.clamp(min, max)
    }
}

fn exact_metrics(point: &ReferencePoint) -> InterpolatedMetrics {
    InterpolatedMetrics {
        threshold: point.threshold,
        flagged: point.flagged,
        flagged_pct: point.flagged_pct,
        annual_cost_millions: point.annual_cost_millions,
        false_positives: point.false_positives,
        false_negatives: point.false_negatives,
        accuracy_pct: point.accuracy_pct,
        regional_rates: point.regional_rates.clone(),
        is_interpolated: false,
    }
}

fn interpolated_metrics(
    threshold: f64,
    lo: &ReferencePoint,
    hi: &ReferencePoint,
) -> InterpolatedMetrics {
    let t = fraction(threshold, lo.threshold, hi.threshold);

    let mut regional_rates = BTreeMap::new();
    for (region, lo_stat) in &lo.regional_rates {
        // The table invariant guarantees both points carry the same regions.
        let hi_stat = &hi.regional_rates[region];
        regional_rates.insert(
            region.clone(),
            RegionStat {
                rate_pct: lerp(lo_stat.rate_pct, hi_stat.rate_pct, t),
                // Sample sizes are not interpolated; the smaller cohort is
                // propagated so reliability warnings stay conservative.
                sample_size: lo_stat.sample_size.min(hi_stat.sample_size),
            },
        );
    }

    InterpolatedMetrics {
        threshold,
        flagged: round_count(lerp(lo.flagged as f64, hi.flagged as f64, t)),
        flagged_pct: lerp(lo.flagged_pct, hi.flagged_pct, t),
        annual_cost_millions: lerp(lo.annual_cost_millions, hi.annual_cost_millions, t),
        false_positives: round_count(lerp(
            lo.false_positives as f64,
            hi.false_positives as f64,
            t,
        )),
        false_negatives: round_count(lerp(
            lo.false_negatives as f64,
            hi.false_negatives as f64,
            t,
        )),
        accuracy_pct: lerp(lo.accuracy_pct, hi.accuracy_pct, t),
        regional_rates,
        is_interpolated: true,
    }
}

/// Threshold outside the table's covered range; no extrapolation policy
/// exists, so callers must clamp or reject before asking again.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("threshold {requested:.3} is outside the covered range [{min:.2}, {max:.2}]")]
pub struct DomainError {
    pub requested: f64,
    pub min: f64,
    pub max: f64,
}
