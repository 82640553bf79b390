use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use threshold_lab::analysis::threshold::{
    ReferenceTable, ReferenceTableImporter, ThresholdEngine, SUPPLIER_POPULATION,
};
use threshold_lab::config::ScenarioConfig;
use threshold_lab::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the engine from the configured source: a CSV export when one is
/// set, otherwise the built-in case table.
pub(crate) fn load_engine(config: &ScenarioConfig) -> Result<ThresholdEngine, AppError> {
    let table = match &config.table_csv {
        Some(path) => load_table_from_csv(path)?,
        None => ReferenceTable::standard(),
    };
    Ok(ThresholdEngine::new(table))
}

pub(crate) fn load_table_from_csv(path: &Path) -> Result<ReferenceTable, AppError> {
    let file = File::open(path)?;
    let table = ReferenceTableImporter::from_reader(file, SUPPLIER_POPULATION)?;
    Ok(table)
}

pub(crate) fn parse_threshold(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a threshold ({err})"))
}
