use crate::infra::load_table_from_csv;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use threshold_lab::analysis::threshold::{
    PerspectiveDetail, ReferenceTable, ThresholdEngine, ThresholdPreset, ThresholdReport,
};
use threshold_lab::config::ScenarioConfig;
use threshold_lab::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Threshold to evaluate (e.g. 0.57)
    #[arg(long, value_parser = crate::infra::parse_threshold)]
    pub(crate) threshold: f64,
    /// Reference threshold for the delta section (defaults to 0.60)
    #[arg(long, value_parser = crate::infra::parse_threshold)]
    pub(crate) reference: Option<f64>,
    /// Clamp an out-of-range threshold into the table domain instead of failing
    #[arg(long)]
    pub(crate) clamp: bool,
    /// Optional CSV export replacing the built-in case table
    #[arg(long)]
    pub(crate) table_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional CSV export replacing the built-in case table
    #[arg(long)]
    pub(crate) table_csv: Option<PathBuf>,
    /// Also print the raw reference table rows
    #[arg(long)]
    pub(crate) show_table: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        threshold,
        reference,
        clamp,
        table_csv,
    } = args;

    let engine = engine_from_path(table_csv)?;
    let threshold = if clamp {
        engine.clamp_to_domain(threshold)
    } else {
        threshold
    };
    let reference = reference.unwrap_or(ScenarioConfig::DEFAULT_REFERENCE_THRESHOLD);

    let report = ThresholdReport::build(&engine, threshold, reference, Utc::now())?;
    render_report(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        table_csv,
        show_table,
    } = args;

    let engine = engine_from_path(table_csv)?;
    let table = engine.table();
    let (min, max) = table.domain();

    println!("Threshold decision demo");
    println!(
        "Reference table: {} operating points covering thresholds {:.2} to {:.2} ({} suppliers assessed)",
        table.points().len(),
        min,
        max,
        table.supplier_population()
    );

    if show_table {
        println!("\nOperating points");
        for point in table.points() {
            println!(
                "- {:.2}: {} flagged ({:.1}%), ${:.1}M, {} FP / {} FN, accuracy {:.1}%",
                point.threshold,
                point.flagged,
                point.flagged_pct,
                point.annual_cost_millions,
                point.false_positives,
                point.false_negatives,
                point.accuracy_pct
            );
        }
    }

    println!("\nStakeholder presets");
    for preset in ThresholdPreset::ordered() {
        let threshold = engine.clamp_to_domain(preset.threshold());
        let report = ThresholdReport::build(
            &engine,
            threshold,
            ScenarioConfig::DEFAULT_REFERENCE_THRESHOLD,
            Utc::now(),
        )?;
        println!(
            "- {}: ${:.1}M, {} missed risks, balance score {:.1} ({})",
            preset.label(),
            report.metrics.annual_cost_millions,
            report.metrics.false_negatives,
            report.scores.balance,
            preset.rationale()
        );
    }

    let midpoint = (min + max) / 2.0;
    println!("\nFull report at the domain midpoint ({midpoint:.3})");
    let report = ThresholdReport::build(
        &engine,
        midpoint,
        ScenarioConfig::DEFAULT_REFERENCE_THRESHOLD,
        Utc::now(),
    )?;
    render_report(&report);

    Ok(())
}

fn engine_from_path(table_csv: Option<PathBuf>) -> Result<ThresholdEngine, AppError> {
    let table = match table_csv {
        Some(path) => load_table_from_csv(&path)?,
        None => ReferenceTable::standard(),
    };
    Ok(ThresholdEngine::new(table))
}

fn render_report(report: &ThresholdReport) {
    let metrics = &report.metrics;
    let source = if metrics.is_interpolated {
        "interpolated"
    } else {
        "table entry"
    };
    println!("Threshold {:.3} ({source})", metrics.threshold);
    if let Some(preset) = &report.preset {
        println!("Preset: {} - {}", preset.label, preset.rationale);
    }

    println!("\nHeadline metrics");
    println!(
        "- Flagged suppliers: {} of {} ({:.1}%)",
        metrics.flagged, metrics.supplier_population, metrics.flagged_pct
    );
    println!(
        "- Annual review cost: ${:.1}M",
        metrics.annual_cost_millions
    );
    println!(
        "- False positives: {} | False negatives: {}",
        metrics.false_positives, metrics.false_negatives
    );
    println!("- Model accuracy: {:.1}%", metrics.accuracy_pct);

    println!("\nRegional flagging rates");
    for region in &metrics.regional_rates {
        let caution = if region.low_sample {
            " - small sample, interpret with caution"
        } else {
            ""
        };
        println!(
            "- {}: {:.1}% (n={}){}",
            region.region, region.rate_pct, region.sample_size, caution
        );
    }
    println!(
        "- Spread across regions: {:.1} percentage points",
        metrics.fairness_spread_pct
    );

    let scores = &report.scores;
    println!("\nStakeholder scores (0-10)");
    println!(
        "- CFO {:.1} | CSO {:.1} | Supplier Relations {:.1} | Fairness {:.1}",
        scores.cfo, scores.cso, scores.supplier_relations, scores.fairness
    );
    println!("- Balance: {:.1}", scores.balance);

    let delta = &report.delta_vs_reference;
    println!(
        "\nVs reference threshold {:.2}",
        delta.reference_threshold
    );
    println!(
        "- Flagged {:+} ({:+.1} pts) | Cost {:+.1}M | FP {:+} | FN {:+} | Accuracy {:+.1} pts",
        delta.flagged,
        delta.flagged_pct,
        delta.annual_cost_millions,
        delta.false_positives,
        delta.false_negatives,
        delta.accuracy_pct
    );

    println!("\nStakeholder perspectives");
    for perspective in &report.perspectives {
        match perspective.preferred_threshold {
            Some(preferred) => println!(
                "- {} ({}, {}; prefers {:.2})",
                perspective.name, perspective.role_label, perspective.focus, preferred
            ),
            None => println!(
                "- {} ({}, {})",
                perspective.name, perspective.role_label, perspective.focus
            ),
        }
        match &perspective.detail {
            PerspectiveDetail::CostGap {
                preferred_cost_millions,
                current_cost_millions,
                gap_millions,
                gap_pct,
            } => println!(
                "  Cost: ${:.1}M vs preferred ${:.1}M ({:+.1}M, {:+.0}%)",
                current_cost_millions, preferred_cost_millions, gap_millions, gap_pct
            ),
            PerspectiveDetail::MissedRiskGap {
                preferred_false_negatives,
                current_false_negatives,
                gap,
                gap_pct,
            } => println!(
                "  Missed risks: {} vs preferred {} ({:+}, {:+.0}%)",
                current_false_negatives, preferred_false_negatives, gap, gap_pct
            ),
            PerspectiveDetail::FlaggingBurden {
                flagged,
                flagged_pct,
            } => println!(
                "  Review burden: {} suppliers flagged ({:.0}%)",
                flagged, flagged_pct
            ),
            PerspectiveDetail::RegionalDisparity {
                disparity_pct,
                rates_pct,
            } => {
                let rates: Vec<String> = rates_pct
                    .iter()
                    .map(|(region, rate)| format!("{region} {rate:.1}%"))
                    .collect();
                println!(
                    "  Regional disparity: {:.1} points ({})",
                    disparity_pct,
                    rates.join(", ")
                );
            }
        }
        println!("  \"{}\"", perspective.quote);
    }
}
