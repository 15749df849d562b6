use super::assembler::{OutlierRecord, RateRow, SeriesRows};
use crate::qa::RateMetric;
use crate::utils::month_name;

/// One output table: every series of a group for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub metric: RateMetric,
    pub year: i32,
    pub months: Vec<u32>,
    pub rows: Vec<RateRow>,
}

impl RateTable {
    pub fn new(metric: RateMetric, year: i32, months: Vec<u32>) -> Self {
        Self {
            metric,
            year,
            months,
            rows: Vec::new(),
        }
    }

    /// `id,site,pollutant,<month names>[,<year>]`
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["id".to_string(), "site".to_string(), "pollutant".to_string()];
        header.extend(self.months.iter().map(|m| month_name(*m).to_string()));
        if self.metric.has_annual_summary() {
            header.push(self.year.to_string());
        }
        header
    }

    /// Cells of one row aligned on [`RateTable::header`]; undefined values are empty.
    pub fn record(&self, row: &RateRow) -> Vec<String> {
        let mut record = vec![
            row.key.measurement_id.clone(),
            row.key.site.clone(),
            row.key.pollutant.clone(),
        ];
        record.extend(self.months.iter().map(|m| format_cell(row.value_for(*m))));
        if self.metric.has_annual_summary() {
            record.push(format_cell(row.annual));
        }
        record
    }
}

fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

/// Everything a group run publishes, ready for the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub year: i32,
    /// One table per metric, in `RateMetric::ALL` order.
    pub tables: Vec<RateTable>,
    /// Lost-rate rows of breached series.
    pub flagged: RateTable,
    pub outliers: Vec<OutlierRecord>,
}

impl GroupReport {
    pub fn new(year: i32, months: Vec<u32>) -> Self {
        Self {
            year,
            tables: RateMetric::ALL
                .iter()
                .map(|m| RateTable::new(*m, year, months.clone()))
                .collect(),
            flagged: RateTable::new(RateMetric::LostRate, year, months),
            outliers: Vec::new(),
        }
    }

    pub fn push_series(&mut self, series: SeriesRows) {
        for (metric, row) in series.rows {
            if let Some(table) = self.tables.iter_mut().find(|t| t.metric == metric) {
                table.rows.push(row);
            }
        }
        if let Some(row) = series.flagged {
            self.flagged.rows.push(row);
        }
    }

    pub fn table(&self, metric: RateMetric) -> Option<&RateTable> {
        self.tables.iter().find(|t| t.metric == metric)
    }

    pub fn series_count(&self) -> usize {
        self.tables.first().map_or(0, |t| t.rows.len())
    }
}
