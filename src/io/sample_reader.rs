//! Per-site sample table reader
//!
//! Reads the merged table produced by the retrieval step, one file per site
//! with columns `date, id, value, unit, state, validated`. Columns are
//! located by header name, so a leading index column or any extra column is
//! ignored.
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use super::error::IoError;
use crate::qa::{Sample, StateCode};

struct Columns {
    date: usize,
    id: usize,
    state: usize,
    value: Option<usize>,
    unit: Option<usize>,
    validated: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self, IoError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| IoError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })
        };

        Ok(Self {
            date: require("date")?,
            id: require("id")?,
            state: require("state")?,
            value: find("value"),
            unit: find("unit"),
            validated: find("validated"),
        })
    }
}

/// Parses a timestamp in any of the forms the retrieval step produces.
///
/// Naive timestamps are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }
    None
}

fn parse_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_validated(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

fn parse_optional_string(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A single-letter code from the closed set, `None` for anything else.
fn parse_state(value: &str) -> Option<StateCode> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => StateCode::from_char(c),
        _ => None,
    }
}

/// Converts one record. Returns the raw state text alongside the sample
/// when the code was not recognised.
fn record_to_sample(
    record: &StringRecord,
    columns: &Columns,
) -> Result<(Sample, Option<String>), IoError> {
    let line = record.position().map_or(0, |p| p.line());
    let get = |idx: usize| record.get(idx).unwrap_or("");

    let date = get(columns.date);
    let timestamp = parse_timestamp(date).ok_or_else(|| IoError::InvalidRecord {
        line,
        msg: format!("invalid date '{date}'"),
    })?;

    let measurement_id = get(columns.id).trim().to_string();
    if measurement_id.is_empty() {
        return Err(IoError::InvalidRecord {
            line,
            msg: "empty measurement id".to_string(),
        });
    }

    // Unrecognised codes only count in the month denominator, like W
    let state_str = get(columns.state).trim();
    let (state, unknown) = match parse_state(state_str) {
        Some(state) => (state, None),
        None => {
            debug!(line, code = state_str, "Unknown state code");
            (StateCode::W, Some(state_str.to_string()))
        }
    };

    let sample = Sample {
        timestamp,
        measurement_id,
        value: columns.value.and_then(|i| parse_value(get(i))),
        unit: columns.unit.and_then(|i| parse_optional_string(get(i))),
        state,
        validated: columns.validated.is_some_and(|i| parse_validated(get(i))),
    };
    Ok((sample, unknown))
}

/// Reads every sample of a CSV source.
///
/// A bad date or an empty id fails the whole source. A state code outside
/// the known set is kept as an ignored (W) sample and reported once per source.
pub fn parse_samples<R: std::io::Read>(reader: R, path: &Path) -> Result<Vec<Sample>, IoError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = Columns::locate(&headers, path)?;

    let mut samples = Vec::new();
    let mut unknown_codes: Vec<String> = Vec::new();
    let mut unknown_count = 0;
    for result in rdr.records() {
        let record = result?;
        let (sample, unknown) = record_to_sample(&record, &columns)?;
        if let Some(code) = unknown {
            unknown_count += 1;
            if !unknown_codes.contains(&code) {
                unknown_codes.push(code);
            }
        }
        samples.push(sample);
    }

    if unknown_count > 0 {
        warn!(
            path = %path.display(),
            codes = ?unknown_codes,
            "{} samples with unknown state codes counted as ignored",
            unknown_count
        );
    }
    Ok(samples)
}

/// Reads one site's sample file.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn read_samples(path: &Path) -> Result<Vec<Sample>, IoError> {
    let file = File::open(path)?;
    let samples = parse_samples(file, path)?;
    debug!("Read {} samples", samples.len());
    Ok(samples)
}

/// `{input_dir}/{year}/{group}/{site}.csv`
pub fn site_file_path(input_dir: &Path, year: i32, group: &str, site: &str) -> PathBuf {
    input_dir
        .join(year.to_string())
        .join(group)
        .join(format!("{site}.csv"))
}
