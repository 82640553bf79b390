//! CSV loader for custom reference tables.
//!
//! Expected layout: the fixed metric columns `threshold`, `flagged`,
//! `flagged_pct`, `cost_millions`, `false_positives`, `false_negatives`,
//! `accuracy_pct`, plus one `rate:<Region>` / `n:<Region>` column pair per
//! region. Region columns are discovered from the header row, so the
//! region set is not fixed in code.

use std::collections::BTreeMap;
use std::io::Read;

use csv::StringRecord;

use super::domain::{ReferencePoint, RegionStat};
use super::table::{ReferenceTable, TableError};

const COLUMN_THRESHOLD: &str = "threshold";
const COLUMN_FLAGGED: &str = "flagged";
const COLUMN_FLAGGED_PCT: &str = "flagged_pct";
const COLUMN_COST: &str = "cost_millions";
const COLUMN_FALSE_POSITIVES: &str = "false_positives";
const COLUMN_FALSE_NEGATIVES: &str = "false_negatives";
const COLUMN_ACCURACY: &str = "accuracy_pct";
const RATE_PREFIX: &str = "rate:";
const SAMPLE_PREFIX: &str = "n:";

pub struct ReferenceTableImporter;

impl ReferenceTableImporter {
    pub fn from_reader<R: Read>(
        reader: R,
        supplier_population: u32,
    ) -> Result<ReferenceTable, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = ColumnLayout::from_headers(&headers)?;

        let mut points = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            points.push(layout.parse_point(&record, index + 1)?);
        }

        Ok(ReferenceTable::new(points, supplier_population)?)
    }
}

struct RegionColumns {
    name: String,
    rate: usize,
    sample: usize,
}

struct ColumnLayout {
    threshold: usize,
    flagged: usize,
    flagged_pct: usize,
    cost: usize,
    false_positives: usize,
    false_negatives: usize,
    accuracy: usize,
    regions: Vec<RegionColumns>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
        };

        let mut regions = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(region) = header.strip_prefix(RATE_PREFIX) {
                let sample_column = format!("{SAMPLE_PREFIX}{region}");
                let sample = headers
                    .iter()
                    .position(|candidate| candidate == sample_column)
                    .ok_or(ImportError::MissingColumn(sample_column))?;
                regions.push(RegionColumns {
                    name: region.to_string(),
                    rate: index,
                    sample,
                });
            }
        }

        Ok(Self {
            threshold: find(COLUMN_THRESHOLD)?,
            flagged: find(COLUMN_FLAGGED)?,
            flagged_pct: find(COLUMN_FLAGGED_PCT)?,
            cost: find(COLUMN_COST)?,
            false_positives: find(COLUMN_FALSE_POSITIVES)?,
            false_negatives: find(COLUMN_FALSE_NEGATIVES)?,
            accuracy: find(COLUMN_ACCURACY)?,
            regions,
        })
    }

    fn parse_point(&self, record: &StringRecord, row: usize) -> Result<ReferencePoint, ImportError> {
        let mut regional_rates = BTreeMap::new();
        for region in &self.regions {
            let rate_column = format!("{RATE_PREFIX}{}", region.name);
            let sample_column = format!("{SAMPLE_PREFIX}{}", region.name);
            regional_rates.insert(
                region.name.clone(),
                RegionStat {
                    rate_pct: parse_f64(record, region.rate, &rate_column, row)?,
                    sample_size: parse_u32(record, region.sample, &sample_column, row)?,
                },
            );
        }

        Ok(ReferencePoint {
            threshold: parse_f64(record, self.threshold, COLUMN_THRESHOLD, row)?,
            flagged: parse_u32(record, self.flagged, COLUMN_FLAGGED, row)?,
            flagged_pct: parse_f64(record, self.flagged_pct, COLUMN_FLAGGED_PCT, row)?,
            annual_cost_millions: parse_f64(record, self.cost, COLUMN_COST, row)?,
            false_positives: parse_u32(record, self.false_positives, COLUMN_FALSE_POSITIVES, row)?,
            false_negatives: parse_u32(record, self.false_negatives, COLUMN_FALSE_NEGATIVES, row)?,
            accuracy_pct: parse_f64(record, self.accuracy, COLUMN_ACCURACY, row)?,
            regional_rates,
        })
    }
}

fn raw_value<'a>(
    record: &'a StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<&'a str, ImportError> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ImportError::MissingValue {
            row,
            column: column.to_string(),
        }),
    }
}

fn parse_f64(
    record: &StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64, ImportError> {
    let value = raw_value(record, index, column, row)?;
    value.parse().map_err(|_| ImportError::InvalidNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(
    record: &StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<u32, ImportError> {
    let value = raw_value(record, index, column, row)?;
    value.parse().map_err(|_| ImportError::InvalidNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Failures while loading a reference table from CSV; fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: missing value for column '{column}'")]
    MissingValue { row: usize, column: String },
    #[error("row {row}: '{value}' is not a valid number for column '{column}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}
