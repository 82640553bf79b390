use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Absolute tolerance when deciding that two threshold values are the same
/// operating point.
pub const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Flagging rate and cohort size for one geographic region at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionStat {
    /// Share of the region's suppliers flagged for review, in percent.
    pub rate_pct: f64,
    /// Number of suppliers the rate was measured over.
    pub sample_size: u32,
}

impl RegionStat {
    /// Cohorts below this size carry a reliability warning in reports.
    pub const MIN_RELIABLE_SAMPLE: u32 = 30;

    pub const fn is_low_sample(&self) -> bool {
        self.sample_size < Self::MIN_RELIABLE_SAMPLE
    }
}

/// One precomputed operating point of the assessment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub threshold: f64,
    pub flagged: u32,
    pub flagged_pct: f64,
    pub annual_cost_millions: f64,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub accuracy_pct: f64,
    /// Flagging rate per region, keyed by region name.
    pub regional_rates: BTreeMap<String, RegionStat>,
}

impl ReferencePoint {
    /// Difference between the highest and lowest regional flagging rate.
    pub fn fairness_spread(&self) -> f64 {
        rate_spread(&self.regional_rates)
    }
}

/// Complete metric set for an arbitrary threshold inside the table domain.
///
/// Field-for-field mirror of [`ReferencePoint`], derived by linear
/// interpolation when the threshold falls strictly between two table
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedMetrics {
    pub threshold: f64,
    pub flagged: u32,
    pub flagged_pct: f64,
    pub annual_cost_millions: f64,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub accuracy_pct: f64,
    pub regional_rates: BTreeMap<String, RegionStat>,
    /// False when the threshold matched a table entry exactly.
    pub is_interpolated: bool,
}

impl InterpolatedMetrics {
    pub fn fairness_spread(&self) -> f64 {
        rate_spread(&self.regional_rates)
    }
}

pub(crate) fn rate_spread(rates: &BTreeMap<String, RegionStat>) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for stat in rates.values() {
        min = min.min(stat.rate_pct);
        max = max.max(stat.rate_pct);
    }
    if rates.is_empty() {
        0.0
    } else {
        max - min
    }
}

/// Stakeholder scores on a 0-10 scale, plus their mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeholderScores {
    pub cfo: f64,
    pub cso: f64,
    pub supplier_relations: f64,
    pub fairness: f64,
    /// Arithmetic mean of the four stakeholder scores.
    pub balance: f64,
}

/// Quick-select operating points from the case discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
    CostFocused,
    Balanced,
    RiskFocused,
}

impl ThresholdPreset {
    pub const fn ordered() -> [Self; 3] {
        [Self::CostFocused, Self::Balanced, Self::RiskFocused]
    }

    pub const fn threshold(self) -> f64 {
        match self {
            Self::CostFocused => 0.50,
            Self::Balanced => 0.60,
            Self::RiskFocused => 0.70,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CostFocused => "CFO (0.50)",
            Self::Balanced => "Balanced (0.60)",
            Self::RiskFocused => "CSO (0.70)",
        }
    }

    pub const fn rationale(self) -> &'static str {
        match self {
            Self::CostFocused => "Cost-conscious: lower threshold keeps review spend down",
            Self::Balanced => "Middle ground between cost and risk",
            Self::RiskFocused => "Risk-averse: higher threshold misses fewer problem suppliers",
        }
    }

    /// Preset whose threshold matches `threshold` within tolerance, if any.
    pub fn matching(threshold: f64) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|preset| (preset.threshold() - threshold).abs() <= THRESHOLD_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(values: &[(&str, f64, u32)]) -> BTreeMap<String, RegionStat> {
        values
            .iter()
            .map(|(name, rate_pct, sample_size)| {
                (
                    name.to_string(),
                    RegionStat {
                        rate_pct: *rate_pct,
                        sample_size: *sample_size,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn fairness_spread_is_max_minus_min() {
        let rates = stats(&[("China", 49.9, 1172), ("India", 51.7, 60), ("Other", 42.9, 14)]);
        let spread = rate_spread(&rates);
        assert!((spread - 8.8).abs() < 1e-9);
    }

    #[test]
    fn small_cohorts_are_flagged_unreliable() {
        let reliable = RegionStat {
            rate_pct: 50.0,
            sample_size: 60,
        };
        let unreliable = RegionStat {
            rate_pct: 42.9,
            sample_size: 14,
        };
        assert!(!reliable.is_low_sample());
        assert!(unreliable.is_low_sample());
    }

    #[test]
    fn preset_matching_uses_tolerance() {
        assert_eq!(
            ThresholdPreset::matching(0.60),
            Some(ThresholdPreset::Balanced)
        );
        assert_eq!(ThresholdPreset::matching(0.57), None);
    }
}
