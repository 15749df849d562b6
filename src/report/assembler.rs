use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::qa::{AnnualRateReport, RateMetric, Sample, SeriesKey, StateCode, SummaryPolicy};

/// One row of a metric table: a series and its value for each month.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub key: SeriesKey,
    /// `(month, value)` in calendar order; `None` marks an undefined maximum.
    pub values: Vec<(u32, Option<f64>)>,
    /// Annual summary, only for metrics that carry one.
    pub annual: Option<f64>,
}

impl RateRow {
    pub fn value_for(&self, month: u32) -> Option<f64> {
        self.values
            .iter()
            .find(|(m, _)| *m == month)
            .and_then(|(_, v)| *v)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().and_then(|(_, v)| *v)
    }
}

/// All rows of one series, one per metric, plus the flagged copy on breach.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRows {
    pub rows: Vec<(RateMetric, RateRow)>,
    pub flagged: Option<RateRow>,
}

impl SeriesRows {
    pub fn row(&self, metric: RateMetric) -> Option<&RateRow> {
        self.rows.iter().find(|(m, _)| *m == metric).map(|(_, r)| r)
    }
}

/// One flagged sample of the outlier table, with the sample fields kept as read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRecord {
    pub site: String,
    pub date: DateTime<Utc>,
    pub id: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub state: StateCode,
    pub validated: bool,
}

impl OutlierRecord {
    pub fn from_sample(site: &str, sample: &Sample) -> Self {
        Self {
            site: site.to_string(),
            date: sample.timestamp,
            id: sample.measurement_id.clone(),
            value: sample.value,
            unit: sample.unit.clone(),
            state: sample.state,
            validated: sample.validated,
        }
    }
}

/// Turns computed series reports into table rows and applies the breach rule.
///
/// Pure decision logic: nothing is counted here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportAssembler {
    pub breach_threshold: f64,
}

impl ReportAssembler {
    pub fn new(breach_threshold: f64) -> Self {
        Self { breach_threshold }
    }

    /// Uses the policy's own breach threshold unless one is given.
    pub fn for_policy(policy: &SummaryPolicy, breach_threshold: Option<f64>) -> Self {
        Self::new(breach_threshold.unwrap_or_else(|| policy.default_breach_threshold()))
    }

    /// A series is breached when the lost rate of its last processed month
    /// is strictly above the threshold.
    pub fn is_breach(&self, report: &AnnualRateReport) -> bool {
        report
            .last_month()
            .is_some_and(|m| m.overall_lost_rate > self.breach_threshold)
    }

    pub fn rows_for(&self, metric: RateMetric, report: &AnnualRateReport) -> RateRow {
        let annual = match metric {
            RateMetric::OperationalRate => Some(report.annual_operational_rate),
            RateMetric::DisponibilityRate => Some(report.annual_disponibility_rate),
            _ => None,
        };

        RateRow {
            key: report.key.clone(),
            values: report
                .months
                .iter()
                .map(|m| (m.month, metric.value(m)))
                .collect(),
            annual,
        }
    }

    pub fn assemble(&self, report: &AnnualRateReport) -> SeriesRows {
        let rows: Vec<(RateMetric, RateRow)> = RateMetric::ALL
            .iter()
            .map(|metric| (*metric, self.rows_for(*metric, report)))
            .collect();

        let flagged = if self.is_breach(report) {
            let lost = self.rows_for(RateMetric::LostRate, report);
            warn!(
                site = %report.key.site,
                measurement_id = %report.key.measurement_id,
                overall_lost_rate = ?lost.last_value(),
                threshold = self.breach_threshold,
                "Lost rate breach"
            );
            Some(lost)
        } else {
            None
        };

        SeriesRows { rows, flagged }
    }
}
