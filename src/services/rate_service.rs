use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::io::{read_samples, read_station_list, site_file_path, IoError, ReportWriter};
use crate::qa::{accumulate, detect, slice_months, Sample, SeriesKey, SummaryPolicy};
use crate::rate_error::RateError;
use crate::report::{GroupReport, OutlierRecord, ReportAssembler, SeriesRows};

/// Error types for group runs
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything computed for one site table.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteOutcome {
    pub site: String,
    /// One entry per measurement series that completed, in first-seen order.
    pub series: Vec<SeriesRows>,
    pub outliers: Vec<OutlierRecord>,
    /// Series aborted by a corrupt month or an empty window.
    pub failures: Vec<RateError>,
}

impl SiteOutcome {
    pub fn breached_series(&self) -> usize {
        self.series.iter().filter(|s| s.flagged.is_some()).count()
    }
}

/// Outcome of one (group, year) run, also written as `run_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub year: i32,
    pub policy: SummaryPolicy,
    pub breach_threshold: f64,
    pub outlier_threshold: f64,
    pub sites_processed: usize,
    pub sites_failed: usize,
    pub failed_sites: Vec<String>,
    pub series_processed: usize,
    pub series_failed: usize,
    pub breached_series: usize,
    pub outliers: usize,
    pub output_dir: PathBuf,
}

/// Computes the rate tables of station groups for one year.
#[derive(Debug, Clone)]
pub struct RateService {
    config: Config,
    year: i32,
    policy: SummaryPolicy,
    assembler: ReportAssembler,
    show_progress: bool,
}

impl RateService {
    pub fn new(config: Config, year: i32, policy: SummaryPolicy) -> Self {
        let assembler = ReportAssembler::for_policy(&policy, config.breach_threshold);
        Self {
            config,
            year,
            policy,
            assembler,
            show_progress: false,
        }
    }

    /// Draw a progress bar over the sites of a group.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn policy(&self) -> SummaryPolicy {
        self.policy
    }

    /// Runs each measurement series of a site table in first-seen order:
    /// outlier detection over the full series, then the monthly accumulation.
    ///
    /// A failing series is logged and recorded; the other series go on.
    #[instrument(skip(self, samples), fields(site = %site, samples = samples.len()))]
    pub fn process_site(&self, site: &str, samples: &[Sample]) -> SiteOutcome {
        let mut seen = HashSet::new();
        let measurement_ids: Vec<&str> = samples
            .iter()
            .map(|s| s.measurement_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect();

        let mut series = Vec::with_capacity(measurement_ids.len());
        let mut outliers = Vec::new();
        let mut failures = Vec::new();

        for measurement_id in measurement_ids {
            let key = SeriesKey::new(site, measurement_id);
            let series_samples: Vec<Sample> = samples
                .iter()
                .filter(|s| s.measurement_id == measurement_id)
                .cloned()
                .collect();

            let flagged = detect(&series_samples, self.config.outlier_threshold);
            if !flagged.is_empty() {
                debug!(measurement_id = %measurement_id, "Found {} outliers", flagged.len());
            }
            outliers.extend(flagged.iter().map(|s| OutlierRecord::from_sample(site, s)));

            let slices = slice_months(&series_samples, self.year, self.policy.months());

            match accumulate(&key, &slices, self.policy) {
                Ok(report) => series.push(self.assembler.assemble(&report)),
                Err(e) => {
                    warn!(measurement_id = %measurement_id, "Skipping series: {}", e);
                    failures.push(e);
                }
            }
        }

        SiteOutcome {
            site: site.to_string(),
            series,
            outliers,
            failures,
        }
    }

    /// Processes every station of `group` listed in its station list.
    pub async fn run_group(&self, group: &str) -> Result<GroupSummary, ServiceError> {
        let sites = read_station_list(&self.config.station_list_dir, group)?;
        self.run_sites(group, sites).await
    }

    /// Processes the given sites of `group` and writes the group outputs.
    ///
    /// Sites are read and computed on the blocking pool, up to
    /// `worker_concurrency` at a time; outputs keep the order of `sites`.
    #[instrument(skip(self, sites), fields(group = %group, year = self.year, sites = sites.len()))]
    pub async fn run_sites(
        &self,
        group: &str,
        sites: Vec<String>,
    ) -> Result<GroupSummary, ServiceError> {
        let start_time = Instant::now();
        let total_sites = sites.len();
        info!("Processing {} sites for {} {}", sites.len(), group, self.year);

        let writer = ReportWriter::new(&self.config.output_dir, self.year, group);
        writer.prepare()?;

        let pb = if self.show_progress {
            ProgressBar::new(total_sites as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.set_message(group.to_string());

        let concurrency = self.config.worker_concurrency.max(1);
        let results: Vec<(String, Result<SiteOutcome, ServiceError>)> = stream::iter(sites)
            .map(|site| {
                let service = self.clone();
                let path = site_file_path(&self.config.input_dir, self.year, group, &site);
                let pb = pb.clone();
                async move {
                    let task_site = site.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        let samples = read_samples(&path)?;
                        Ok::<_, IoError>(service.process_site(&task_site, &samples))
                    })
                    .await;
                    pb.inc(1);
                    let result = match result {
                        Ok(outcome) => outcome.map_err(ServiceError::from),
                        Err(e) => Err(ServiceError::from(e)),
                    };
                    (site, result)
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut report = GroupReport::new(self.year, self.policy.months().collect());
        let mut failed_sites = Vec::new();
        let mut series_failed = 0;
        let mut breached_series = 0;

        for (site, result) in results {
            match result {
                Ok(outcome) => {
                    series_failed += outcome.failures.len();
                    breached_series += outcome.breached_series();
                    for series in outcome.series {
                        report.push_series(series);
                    }
                    report.outliers.extend(outcome.outliers);
                }
                Err(e) => {
                    error!(site = %site, "Site failed: {}", e);
                    failed_sites.push(site);
                }
            }
        }
        pb.finish_with_message(format!("{group} done"));

        writer.write_group(&report)?;

        let summary = GroupSummary {
            group: group.to_string(),
            year: self.year,
            policy: self.policy,
            breach_threshold: self.assembler.breach_threshold,
            outlier_threshold: self.config.outlier_threshold,
            sites_processed: total_sites - failed_sites.len(),
            sites_failed: failed_sites.len(),
            failed_sites,
            series_processed: report.series_count(),
            series_failed,
            breached_series,
            outliers: report.outliers.len(),
            output_dir: writer.dir().to_path_buf(),
        };
        writer.write_summary(&summary)?;

        info!(
            "✓ {} {} complete ({:.1}s, {} series, {} breached, {} outliers)",
            group,
            self.year,
            start_time.elapsed().as_secs_f64(),
            summary.series_processed,
            summary.breached_series,
            summary.outliers
        );

        Ok(summary)
    }
}
