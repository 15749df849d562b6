use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use super::error::IoError;
use crate::report::{GroupReport, OutlierRecord, RateTable};

pub const FLAGGED_FILE_NAME: &str = "pert_repport.csv";
pub const OUTLIERS_FILE_NAME: &str = "outliers.csv";
pub const SUMMARY_FILE_NAME: &str = "run_summary.json";

const OUTLIER_HEADER: [&str; 7] = ["site", "date", "id", "value", "unit", "state", "validated"];

/// Writes a group's tables under `{output_root}/rates/{year}/{group}`.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_root: &Path, year: i32, group: &str) -> Self {
        Self {
            dir: output_root
                .join("rates")
                .join(year.to_string())
                .join(group),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory, removing files left by an earlier run.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn prepare(&self) -> Result<(), IoError> {
        if self.dir.exists() {
            let mut removed = 0;
            for entry in fs::read_dir(&self.dir)? {
                let path = entry?.path();
                if path.is_file() {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
            if removed > 0 {
                info!("Cleared {} files from previous run", removed);
            }
        } else {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    pub fn write_table(&self, table: &RateTable, file_name: &str) -> Result<PathBuf, IoError> {
        let path = self.dir.join(file_name);
        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(table.header())?;
        for row in &table.rows {
            wtr.write_record(table.record(row))?;
        }
        wtr.flush()?;
        Ok(path)
    }

    pub fn write_outliers(&self, outliers: &[OutlierRecord]) -> Result<PathBuf, IoError> {
        let path = self.dir.join(OUTLIERS_FILE_NAME);
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        // Header written by hand so an empty table still has one
        wtr.write_record(OUTLIER_HEADER)?;
        for record in outliers {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(path)
    }

    pub fn write_summary<T: Serialize>(&self, summary: &T) -> Result<PathBuf, IoError> {
        let path = self.dir.join(SUMMARY_FILE_NAME);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, summary)?;
        Ok(path)
    }

    /// Writes every metric table, the outlier table and, when any series
    /// breached, the flagged lost-rate table.
    #[instrument(skip(self, report), fields(dir = %self.dir.display(), series = report.series_count()))]
    pub fn write_group(&self, report: &GroupReport) -> Result<Vec<PathBuf>, IoError> {
        let mut written = Vec::new();
        for table in &report.tables {
            written.push(self.write_table(table, table.metric.file_name())?);
        }
        if !report.flagged.rows.is_empty() {
            written.push(self.write_table(&report.flagged, FLAGGED_FILE_NAME)?);
        }
        written.push(self.write_outliers(&report.outliers)?);
        info!("Wrote {} files", written.len());
        Ok(written)
    }
}
