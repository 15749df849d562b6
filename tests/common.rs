#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use std::fs;
use std::path::Path;

use station_qa_rates::qa::{Sample, StateCode};

/// One sample on the quarter-hour grid of a month, `slot` 0 being the 1st at 00:00 UTC.
pub fn sample_at(year: i32, month: u32, slot: i64, id: &str, value: Option<f64>, state: StateCode) -> Sample {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("valid month start");
    Sample {
        timestamp: start + Duration::minutes(15 * slot),
        measurement_id: id.to_string(),
        value,
        unit: Some("microg/m3".to_string()),
        state,
        validated: true,
    }
}

/// A month of samples with the given number of each state code, laid out in
/// order on the quarter-hour grid. Every sample carries `value`.
pub fn month_samples(year: i32, month: u32, id: &str, counts: &[(StateCode, usize)], value: f64) -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut slot = 0;
    for (code, n) in counts {
        for _ in 0..*n {
            samples.push(sample_at(year, month, slot, id, Some(value), *code));
            slot += 1;
        }
    }
    samples
}

/// Samples for each month in `months`, all with the same state mix.
pub fn series_for_months(
    year: i32,
    months: std::ops::RangeInclusive<u32>,
    id: &str,
    counts: &[(StateCode, usize)],
) -> Vec<Sample> {
    months
        .flat_map(|m| month_samples(year, m, id, counts, 10.0 + m as f64))
        .collect()
}

/// Writes a site table the way the retrieval step does, with a leading index column.
pub fn write_site_csv(path: &Path, samples: &[Sample]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create site dir");
    }
    let mut content = String::from(",date,id,value,unit,state,validated\n");
    for (i, s) in samples.iter().enumerate() {
        content.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            i,
            s.timestamp.format("%Y-%m-%d %H:%M:%S%:z"),
            s.measurement_id,
            s.value.map(|v| v.to_string()).unwrap_or_default(),
            s.unit.clone().unwrap_or_default(),
            s.state,
            if s.validated { "True" } else { "False" }
        ));
    }
    fs::write(path, content).expect("write site csv");
}

pub fn write_station_list(dir: &Path, group: &str, sites: &[&str]) {
    fs::create_dir_all(dir).expect("create station list dir");
    let mut content = String::from(",id\n");
    for (i, site) in sites.iter().enumerate() {
        content.push_str(&format!("{i},{site}\n"));
    }
    fs::write(dir.join(format!("stations_{group}.csv")), content).expect("write station list");
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
