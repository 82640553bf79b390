//! Built-in case data: the threshold scenario analysis exhibit from the
//! supplier sustainability assessment, plus the geographic fairness panel.

use std::collections::BTreeMap;

use super::domain::{ReferencePoint, RegionStat};
use super::table::ReferenceTable;

pub const REGION_CHINA: &str = "China";
pub const REGION_INDIA: &str = "India";
pub const REGION_OTHER: &str = "Other";

/// Suppliers covered by the assessment model.
pub const SUPPLIER_POPULATION: u32 = 1000;

const CHINA_SAMPLE: u32 = 1172;
const INDIA_SAMPLE: u32 = 60;
const OTHER_SAMPLE: u32 = 14;

impl ReferenceTable {
    /// The standard case table: thresholds 0.50 through 0.70 in 0.05 steps.
    ///
    /// The exhibit's geographic panel reports rates at 0.50/0.60/0.70 only;
    /// the 0.55 and 0.65 rows carry the linearly-implied midpoint rates so
    /// every point covers the full region set.
    pub fn standard() -> Self {
        let points = vec![
            exhibit_point(0.50, 571, 57.1, 4.6, 113, 159, 72.6, [49.9, 51.7, 42.9]),
            exhibit_point(0.55, 747, 74.7, 6.0, 65, 186, 74.8, [58.55, 60.0, 63.75]),
            exhibit_point(0.60, 861, 86.1, 6.9, 46, 205, 74.8, [67.2, 68.3, 84.6]),
            exhibit_point(0.65, 967, 96.7, 7.7, 13, 173, 81.3, [76.15, 79.15, 88.75]),
            exhibit_point(0.70, 994, 99.4, 8.0, 5, 119, 87.5, [85.1, 90.0, 92.9]),
        ];

        Self::new(points, SUPPLIER_POPULATION)
            .expect("standard case table satisfies the table invariants")
    }
}

#[allow(clippy::too_many_arguments)]
fn exhibit_point(
    threshold: f64,
    flagged: u32,
    flagged_pct: f64,
    annual_cost_millions: f64,
    false_positives: u32,
    false_negatives: u32,
    accuracy_pct: f64,
    rates: [f64; 3],
) -> ReferencePoint {
    let mut regional_rates = BTreeMap::new();
    let cohorts = [
        (REGION_CHINA, rates[0], CHINA_SAMPLE),
        (REGION_INDIA, rates[1], INDIA_SAMPLE),
        (REGION_OTHER, rates[2], OTHER_SAMPLE),
    ];
    for (region, rate_pct, sample_size) in cohorts {
        regional_rates.insert(
            region.to_string(),
            RegionStat {
                rate_pct,
                sample_size,
            },
        );
    }

    ReferencePoint {
        threshold,
        flagged,
        flagged_pct,
        annual_cost_millions,
        false_positives,
        false_negatives,
        accuracy_pct,
        regional_rates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_the_case_domain() {
        let table = ReferenceTable::standard();
        assert_eq!(table.points().len(), 5);
        assert_eq!(table.domain(), (0.50, 0.70));
        assert_eq!(table.supplier_population(), SUPPLIER_POPULATION);
    }

    #[test]
    fn every_point_carries_all_three_regions() {
        let table = ReferenceTable::standard();
        for point in table.points() {
            assert_eq!(point.regional_rates.len(), 3);
            assert!(point.regional_rates.contains_key(REGION_OTHER));
        }
    }

    #[test]
    fn other_region_is_a_low_sample_cohort() {
        let table = ReferenceTable::standard();
        let other = &table.points()[0].regional_rates[REGION_OTHER];
        assert!(other.is_low_sample());
    }
}
