/// Sequential accumulation of monthly rates over one year of one series.
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{debug, instrument};

use super::classifier::classify;
use super::rate_calculator::{calculate, AccumulationState, MonthlyRateResult};
use super::sample::{Sample, SeriesKey};
use crate::rate_error::RateError;

/// Number of 15-minute intervals in a day.
pub const QUARTER_HOURS_PER_DAY: u32 = 96;

/// Lost-rate breach threshold of the full-year report flow.
pub const FULL_YEAR_BREACH_THRESHOLD: f64 = 0.25;

/// Lost-rate breach threshold of the year-to-date report flow.
pub const YEAR_TO_DATE_BREACH_THRESHOLD: f64 = 1.0;

/// How the annual summary values are derived.
///
/// A closed year averages its twelve monthly rates; a year still in
/// progress annualizes the raw counts over the days elapsed so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "policy")]
pub enum SummaryPolicy {
    FullYear,
    YearToDate { last_month: u32, days_elapsed: u32 },
}

impl SummaryPolicy {
    /// Picks the policy for `year` as seen on `today`.
    ///
    /// The current year only covers the months that are already over, so
    /// its window ends on the first day of the current month. Returns
    /// `None` for a year that has not started.
    pub fn for_year(year: i32, today: NaiveDate) -> Option<Self> {
        if year < today.year() {
            return Some(SummaryPolicy::FullYear);
        }
        if year > today.year() {
            return None;
        }

        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let month_start = NaiveDate::from_ymd_opt(year, today.month(), 1)?;
        let days_elapsed = (month_start - jan_first).num_days() as u32;

        Some(SummaryPolicy::YearToDate {
            last_month: today.month() - 1,
            days_elapsed,
        })
    }

    /// The full-year policy, only for a year that is over on `today`.
    pub fn full_year(year: i32, today: NaiveDate) -> Option<Self> {
        (year < today.year()).then_some(SummaryPolicy::FullYear)
    }

    /// Year to date up to and including `last_month`, with the elapsed days
    /// counted from Jan 1 to the first day of the following month.
    pub fn year_to_date_through(year: i32, last_month: u32) -> Option<Self> {
        if !(1..=12).contains(&last_month) {
            return None;
        }
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let window_end = if last_month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, last_month + 1, 1)?
        };
        Some(SummaryPolicy::YearToDate {
            last_month,
            days_elapsed: (window_end - jan_first).num_days() as u32,
        })
    }

    /// Calendar months covered by the policy.
    pub fn months(&self) -> RangeInclusive<u32> {
        match self {
            SummaryPolicy::FullYear => 1..=12,
            SummaryPolicy::YearToDate { last_month, .. } => 1..=*last_month,
        }
    }

    pub fn default_breach_threshold(&self) -> f64 {
        match self {
            SummaryPolicy::FullYear => FULL_YEAR_BREACH_THRESHOLD,
            SummaryPolicy::YearToDate { .. } => YEAR_TO_DATE_BREACH_THRESHOLD,
        }
    }
}

/// The samples of one calendar month of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSlice {
    pub month: u32,
    pub samples: Vec<Sample>,
}

/// Splits a series into one slice per requested month of `year`.
///
/// Samples from other years are dropped. Months with no sample still get
/// an (empty) slice so that the accumulator can reject them.
pub fn slice_months(samples: &[Sample], year: i32, months: RangeInclusive<u32>) -> Vec<MonthSlice> {
    let mut slices: Vec<MonthSlice> = months
        .map(|month| MonthSlice {
            month,
            samples: Vec::new(),
        })
        .collect();

    for sample in samples.iter().filter(|s| s.timestamp.year() == year) {
        let month = sample.timestamp.month();
        if let Some(slice) = slices.iter_mut().find(|s| s.month == month) {
            slice.samples.push(sample.clone());
        }
    }

    slices
}

/// Full rate trajectory of one series over the processed window.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualRateReport {
    pub key: SeriesKey,
    pub policy: SummaryPolicy,
    /// One entry per processed month, in calendar order.
    pub months: Vec<MonthlyRateResult>,
    pub annual_operational_rate: f64,
    pub annual_disponibility_rate: f64,
}

impl AnnualRateReport {
    /// The result of the last processed month.
    pub fn last_month(&self) -> Option<&MonthlyRateResult> {
        self.months.last()
    }

    pub fn final_state(&self) -> Option<AccumulationState> {
        self.last_month().map(|m| m.state)
    }
}

/// Runs the rate calculator over `slices` in order, carrying the
/// accumulation state, and derives the annual summary per `policy`.
///
/// The first month that fails aborts the whole series.
#[instrument(skip(slices), fields(site = %key.site, measurement_id = %key.measurement_id))]
pub fn accumulate(
    key: &SeriesKey,
    slices: &[MonthSlice],
    policy: SummaryPolicy,
) -> Result<AnnualRateReport, RateError> {
    let empty_window = || RateError::EmptyWindow {
        site: key.site.clone(),
        measurement_id: key.measurement_id.clone(),
    };

    if slices.is_empty() {
        return Err(empty_window());
    }

    let mut state = AccumulationState::default();
    let mut months = Vec::with_capacity(slices.len());

    for slice in slices {
        let counts = classify(&slice.samples);
        let result = calculate(key, slice.month, &counts, &state)?;
        debug!(
            month = slice.month,
            samples = counts.month_sample_count,
            operational_rate = result.month_operational_rate,
            overall_lost_rate = result.overall_lost_rate,
            "Month accumulated"
        );
        state = result.state;
        months.push(result);
    }

    let (annual_operational_rate, annual_disponibility_rate) = match policy {
        SummaryPolicy::FullYear => {
            let n = months.len() as f64;
            (
                months.iter().map(|m| m.month_operational_rate).sum::<f64>() / n,
                months.iter().map(|m| m.month_disponibility_rate).sum::<f64>() / n,
            )
        }
        SummaryPolicy::YearToDate { days_elapsed, .. } => {
            if days_elapsed == 0 {
                return Err(empty_window());
            }
            let expected = f64::from(days_elapsed * QUARTER_HOURS_PER_DAY);
            let valid_seen: u64 = months.iter().map(|m| m.month_valid_count).sum();
            let disponibility_seen: u64 = months.iter().map(|m| m.month_disponibility_count).sum();
            (
                valid_seen as f64 / expected,
                disponibility_seen as f64 / expected,
            )
        }
    };

    Ok(AnnualRateReport {
        key: key.clone(),
        policy,
        months,
        annual_operational_rate,
        annual_disponibility_rate,
    })
}
