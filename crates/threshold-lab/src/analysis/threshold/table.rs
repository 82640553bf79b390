use serde::Serialize;

use super::domain::{ReferencePoint, THRESHOLD_TOLERANCE};

/// Min/max of one metric observed across the full reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    fn new(first: f64) -> Self {
        Self {
            min: first,
            max: first,
        }
    }

    fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Position of `value` inside the range, or `None` when the range has
    /// zero width and normalization would divide by zero.
    pub fn normalized(&self, value: f64) -> Option<f64> {
        let width = self.max - self.min;
        if width <= THRESHOLD_TOLERANCE {
            None
        } else {
            Some(((value - self.min) / width).clamp(0.0, 1.0))
        }
    }
}

/// Table-wide metric ranges used to normalize stakeholder scores, derived
/// once at construction so scores stay comparable across threshold
/// selections within a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationRanges {
    pub annual_cost_millions: MetricRange,
    pub false_negatives: MetricRange,
    pub false_positives: MetricRange,
    pub flagged_pct: MetricRange,
    pub fairness_spread: MetricRange,
}

impl NormalizationRanges {
    fn derive(points: &[ReferencePoint]) -> Self {
        let first = &points[0];
        let mut ranges = Self {
            annual_cost_millions: MetricRange::new(first.annual_cost_millions),
            false_negatives: MetricRange::new(first.false_negatives as f64),
            false_positives: MetricRange::new(first.false_positives as f64),
            flagged_pct: MetricRange::new(first.flagged_pct),
            fairness_spread: MetricRange::new(first.fairness_spread()),
        };

        for point in &points[1..] {
            ranges.annual_cost_millions.observe(point.annual_cost_millions);
            ranges.false_negatives.observe(point.false_negatives as f64);
            ranges.false_positives.observe(point.false_positives as f64);
            ranges.flagged_pct.observe(point.flagged_pct);
            ranges.fairness_spread.observe(point.fairness_spread());
        }

        ranges
    }
}

/// Immutable, validated table of precomputed operating points.
///
/// Constructed once at startup; the engine assumes a well-formed table and
/// never re-checks the invariants per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    points: Vec<ReferencePoint>,
    supplier_population: u32,
    ranges: NormalizationRanges,
}

impl ReferenceTable {
    pub fn new(
        points: Vec<ReferencePoint>,
        supplier_population: u32,
    ) -> Result<Self, TableError> {
        if points.is_empty() {
            return Err(TableError::Empty);
        }
        if points.len() < 2 {
            return Err(TableError::NotEnoughPoints { found: points.len() });
        }

        for (index, point) in points.iter().enumerate() {
            validate_point(point)?;
            if index > 0 {
                let previous = &points[index - 1];
                if point.threshold - previous.threshold <= THRESHOLD_TOLERANCE {
                    return Err(TableError::NonMonotonic {
                        index,
                        threshold: point.threshold,
                    });
                }
                if !same_regions(previous, point) {
                    return Err(TableError::MismatchedRegions {
                        threshold: point.threshold,
                    });
                }
            }
        }

        let ranges = NormalizationRanges::derive(&points);
        Ok(Self {
            points,
            supplier_population,
            ranges,
        })
    }

    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn supplier_population(&self) -> u32 {
        self.supplier_population
    }

    pub fn ranges(&self) -> &NormalizationRanges {
        &self.ranges
    }

    /// Lowest and highest threshold covered by the table.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.points[0].threshold,
            self.points[self.points.len() - 1].threshold,
        )
    }

    /// Exact table entry for `threshold`, within tolerance.
    pub fn point_at(&self, threshold: f64) -> Option<&ReferencePoint> {
        self.points
            .iter()
            .find(|point| (point.threshold - threshold).abs() <= THRESHOLD_TOLERANCE)
    }
}

fn same_regions(a: &ReferencePoint, b: &ReferencePoint) -> bool {
    a.regional_rates.len() == b.regional_rates.len()
        && a.regional_rates
            .keys()
            .zip(b.regional_rates.keys())
            .all(|(left, right)| left == right)
}

fn validate_point(point: &ReferencePoint) -> Result<(), TableError> {
    let checks = [
        ("threshold", point.threshold),
        ("flagged_pct", point.flagged_pct),
        ("annual_cost_millions", point.annual_cost_millions),
        ("accuracy_pct", point.accuracy_pct),
    ];
    for (field, value) in checks {
        if !value.is_finite() {
            return Err(TableError::NonFinite {
                threshold: point.threshold,
                field,
            });
        }
    }
    for stat in point.regional_rates.values() {
        if !stat.rate_pct.is_finite() {
            return Err(TableError::NonFinite {
                threshold: point.threshold,
                field: "rate_pct",
            });
        }
    }
    Ok(())
}

/// Startup-time validation failures; never raised per call.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("reference table is empty")]
    Empty,
    #[error("reference table needs at least two points, found {found}")]
    NotEnoughPoints { found: usize },
    #[error("thresholds must increase strictly: point {index} at {threshold:.4} does not")]
    NonMonotonic { index: usize, threshold: f64 },
    #[error("point at threshold {threshold:.2} has a non-finite {field}")]
    NonFinite { threshold: f64, field: &'static str },
    #[error("point at threshold {threshold:.2} does not cover the same regions as the first point")]
    MismatchedRegions { threshold: f64 },
}
