use super::super::domain::{ReferencePoint, THRESHOLD_TOLERANCE};

pub(crate) enum Bracket<'a> {
    Exact(&'a ReferencePoint),
    Between {
        lo: &'a ReferencePoint,
        hi: &'a ReferencePoint,
    },
}

/// Locate the table entry matching `threshold`, or the two entries
/// bracketing it. `None` means the threshold lies outside the table domain.
pub(crate) fn bracket(points: &[ReferencePoint], threshold: f64) -> Option<Bracket<'_>> {
    for point in points {
        if (point.threshold - threshold).abs() <= THRESHOLD_TOLERANCE {
            return Some(Bracket::Exact(point));
        }
    }

    points.windows(2).find_map(|pair| {
        let lo = &pair[0];
        let hi = &pair[1];
        if lo.threshold < threshold && threshold < hi.threshold {
            Some(Bracket::Between { lo, hi })
        } else {
            None
        }
    })
}

pub(crate) fn fraction(threshold: f64, lo: f64, hi: f64) -> f64 {
    (threshold - lo) / (hi - lo)
}

pub(crate) fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    lo + t * (hi - lo)
}

/// Counts are interpolated as floats and rounded once at the end, half up.
pub(crate) fn round_count(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn point(threshold: f64) -> ReferencePoint {
        ReferencePoint {
            threshold,
            flagged: 0,
            flagged_pct: 0.0,
            annual_cost_millions: 0.0,
            false_positives: 0,
            false_negatives: 0,
            accuracy_pct: 0.0,
            regional_rates: BTreeMap::new(),
        }
    }

    #[test]
    fn exact_match_wins_over_bracketing() {
        let points = vec![point(0.50), point(0.55), point(0.60)];
        match bracket(&points, 0.55) {
            Some(Bracket::Exact(found)) => assert_eq!(found.threshold, 0.55),
            _ => panic!("expected exact match"),
        }
    }

    #[test]
    fn strictly_interior_threshold_brackets() {
        let points = vec![point(0.50), point(0.55), point(0.60)];
        match bracket(&points, 0.57) {
            Some(Bracket::Between { lo, hi }) => {
                assert_eq!(lo.threshold, 0.55);
                assert_eq!(hi.threshold, 0.60);
            }
            _ => panic!("expected bracketing pair"),
        }
    }

    #[test]
    fn out_of_domain_threshold_has_no_bracket() {
        let points = vec![point(0.50), point(0.70)];
        assert!(bracket(&points, 0.80).is_none());
        assert!(bracket(&points, 0.45).is_none());
    }

    #[test]
    fn fraction_spans_zero_to_one() {
        assert!((fraction(0.55, 0.50, 0.60) - 0.5).abs() < 1e-12);
        assert!((lerp(120.0, 90.0, 0.5) - 105.0).abs() < 1e-12);
    }

    #[test]
    fn counts_round_half_up() {
        assert_eq!(round_count(104.5), 105);
        assert_eq!(round_count(104.4), 104);
    }
}
