//! Neutral stakeholder perspectives: factual comparisons against each
//! stakeholder's stated preference, without status indicators or value
//! judgments about which threshold is better.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{InterpolatedMetrics, ThresholdPreset};
use super::engine::{DomainError, ThresholdEngine};

/// The four voices in the threshold discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderRole {
    Cfo,
    Cso,
    SupplierRelations,
    GeneralCounsel,
}

impl StakeholderRole {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Cfo,
            Self::Cso,
            Self::SupplierRelations,
            Self::GeneralCounsel,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cfo => "CFO",
            Self::Cso => "CSO",
            Self::SupplierRelations => "Supplier Relations",
            Self::GeneralCounsel => "General Counsel",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Cfo => "Hans Verhoeven",
            Self::Cso => "Dr. Amelia Okonkwo",
            Self::SupplierRelations => "James Park",
            Self::GeneralCounsel => "Lisa Martinez",
        }
    }

    pub const fn focus(self) -> &'static str {
        match self {
            Self::Cfo => "Cost Minimization",
            Self::Cso => "Risk Mitigation",
            Self::SupplierRelations => "Partnership",
            Self::GeneralCounsel => "Fairness",
        }
    }

    pub const fn preferred_threshold(self) -> Option<f64> {
        match self {
            Self::Cfo => Some(ThresholdPreset::CostFocused.threshold()),
            Self::Cso => Some(ThresholdPreset::RiskFocused.threshold()),
            Self::SupplierRelations | Self::GeneralCounsel => None,
        }
    }

    const fn quote(self) -> &'static str {
        match self {
            Self::Cfo => {
                "I prefer closer to the $4-5M range we discussed. Have you considered threshold 0.50?"
            }
            Self::Cso => {
                "When we miss problematic suppliers and that becomes a front-page story, what's the cost to our brand? I'd push for 0.70 to catch more."
            }
            Self::SupplierRelations => {
                "We've spent five years building collaborative relationships through the SSP program. The share of suppliers we flag sends a message about the partnership approach."
            }
            Self::GeneralCounsel => {
                "If the model systematically flags certain regions at higher rates not because of actual sustainability differences but because of training data limitations, we have both a legal risk and an ethical problem."
            }
        }
    }
}

/// Stakeholder-specific factual payload for the selected threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerspectiveDetail {
    CostGap {
        preferred_cost_millions: f64,
        current_cost_millions: f64,
        gap_millions: f64,
        gap_pct: f64,
    },
    MissedRiskGap {
        preferred_false_negatives: u32,
        current_false_negatives: u32,
        gap: i64,
        gap_pct: f64,
    },
    FlaggingBurden {
        flagged: u32,
        flagged_pct: f64,
    },
    RegionalDisparity {
        disparity_pct: f64,
        rates_pct: BTreeMap<String, f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderPerspective {
    pub role: StakeholderRole,
    pub role_label: &'static str,
    pub name: &'static str,
    pub focus: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_threshold: Option<f64>,
    pub detail: PerspectiveDetail,
    pub quote: &'static str,
}

/// Build all four perspectives for an evaluated threshold.
///
/// Gap baselines come from the table at each stakeholder's preferred
/// threshold (clamped into the table domain for custom tables), never from
/// hard-coded constants.
pub fn perspectives(
    engine: &ThresholdEngine,
    metrics: &InterpolatedMetrics,
) -> Result<Vec<StakeholderPerspective>, DomainError> {
    StakeholderRole::ordered()
        .into_iter()
        .map(|role| {
            let detail = detail_for(role, engine, metrics)?;
            Ok(StakeholderPerspective {
                role,
                role_label: role.label(),
                name: role.name(),
                focus: role.focus(),
                preferred_threshold: role.preferred_threshold(),
                detail,
                quote: role.quote(),
            })
        })
        .collect()
}

fn detail_for(
    role: StakeholderRole,
    engine: &ThresholdEngine,
    metrics: &InterpolatedMetrics,
) -> Result<PerspectiveDetail, DomainError> {
    match role {
        StakeholderRole::Cfo => {
            let baseline = baseline_metrics(engine, ThresholdPreset::CostFocused.threshold())?;
            let preferred_cost_millions = baseline.annual_cost_millions;
            let gap_millions = metrics.annual_cost_millions - preferred_cost_millions;
            Ok(PerspectiveDetail::CostGap {
                preferred_cost_millions,
                current_cost_millions: metrics.annual_cost_millions,
                gap_millions,
                gap_pct: gap_pct(gap_millions, preferred_cost_millions),
            })
        }
        StakeholderRole::Cso => {
            let baseline = baseline_metrics(engine, ThresholdPreset::RiskFocused.threshold())?;
            let preferred = baseline.false_negatives;
            let gap = i64::from(metrics.false_negatives) - i64::from(preferred);
            Ok(PerspectiveDetail::MissedRiskGap {
                preferred_false_negatives: preferred,
                current_false_negatives: metrics.false_negatives,
                gap,
                gap_pct: gap_pct(gap as f64, f64::from(preferred)),
            })
        }
        StakeholderRole::SupplierRelations => Ok(PerspectiveDetail::FlaggingBurden {
            flagged: metrics.flagged,
            flagged_pct: metrics.flagged_pct,
        }),
        StakeholderRole::GeneralCounsel => Ok(PerspectiveDetail::RegionalDisparity {
            disparity_pct: metrics.fairness_spread(),
            rates_pct: metrics
                .regional_rates
                .iter()
                .map(|(region, stat)| (region.clone(), stat.rate_pct))
                .collect(),
        }),
    }
}

fn baseline_metrics(
    engine: &ThresholdEngine,
    preferred: f64,
) -> Result<InterpolatedMetrics, DomainError> {
    engine.metrics_at(engine.clamp_to_domain(preferred))
}

fn gap_pct(gap: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (gap / baseline) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::threshold::table::ReferenceTable;

    #[test]
    fn cfo_gap_is_measured_against_the_low_threshold() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let metrics = engine.metrics_at(0.60).expect("in-domain threshold");
        let views = perspectives(&engine, &metrics).expect("perspectives build");
        let cfo = &views[0];
        match &cfo.detail {
            PerspectiveDetail::CostGap {
                preferred_cost_millions,
                gap_millions,
                ..
            } => {
                assert_eq!(*preferred_cost_millions, 4.6);
                assert!((gap_millions - 2.3).abs() < 1e-9);
            }
            other => panic!("unexpected CFO detail: {other:?}"),
        }
    }

    #[test]
    fn counsel_detail_reports_every_region() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let metrics = engine.metrics_at(0.60).expect("in-domain threshold");
        let views = perspectives(&engine, &metrics).expect("perspectives build");
        let counsel = views
            .iter()
            .find(|view| view.role == StakeholderRole::GeneralCounsel)
            .expect("counsel view present");
        match &counsel.detail {
            PerspectiveDetail::RegionalDisparity {
                disparity_pct,
                rates_pct,
            } => {
                assert_eq!(rates_pct.len(), 3);
                assert!(*disparity_pct > 0.0);
            }
            other => panic!("unexpected counsel detail: {other:?}"),
        }
    }

    #[test]
    fn gaps_vanish_at_the_preferred_thresholds() {
        let engine = ThresholdEngine::new(ReferenceTable::standard());
        let metrics = engine.metrics_at(0.70).expect("in-domain threshold");
        let views = perspectives(&engine, &metrics).expect("perspectives build");
        let cso = views
            .iter()
            .find(|view| view.role == StakeholderRole::Cso)
            .expect("cso view present");
        match &cso.detail {
            PerspectiveDetail::MissedRiskGap { gap, .. } => assert_eq!(*gap, 0),
            other => panic!("unexpected CSO detail: {other:?}"),
        }
    }
}
