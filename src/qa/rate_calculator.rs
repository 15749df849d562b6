/// Monthly rate derivation with carried accumulation state.
///
/// One call per month, in calendar order. The accumulated counts are
/// threaded explicitly from one call to the next as an immutable value, so
/// two series never share state.

use super::classifier::MonthCounts;
use super::sample::SeriesKey;
use crate::rate_error::RateError;

/// Hours in a non-leap year: the fixed annual budget behind the lost rate.
pub const LOST_RATE_DENOMINATOR: f64 = 8760.0;

/// Fixed annual reference count behind the indisponibility lost rate.
pub const INDISPONIBILITY_LOST_RATE_DENOMINATOR: f64 = 3504.0;

/// Seed of the accumulated valid count at the start of every series.
pub const ACCUMULATED_VALID_SEED: u64 = 2;

/// Counts carried from one month to the next for a single series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulationState {
    pub accumulated_valid_count: u64,
    pub accumulated_lost_count: u64,
    pub accumulated_indisponibility_lost_count: u64,
}

impl Default for AccumulationState {
    fn default() -> Self {
        Self {
            accumulated_valid_count: ACCUMULATED_VALID_SEED,
            accumulated_lost_count: 0,
            accumulated_indisponibility_lost_count: 0,
        }
    }
}

impl AccumulationState {
    pub fn new(valid: u64, lost: u64, indisponibility_lost: u64) -> Self {
        Self {
            accumulated_valid_count: valid,
            accumulated_lost_count: lost,
            accumulated_indisponibility_lost_count: indisponibility_lost,
        }
    }
}

/// Rates for one month of one series. Never mutated once produced.
///
/// Rates are plain ratios and are not clamped: a long lost streak pushes
/// the lost rates above 1.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRateResult {
    pub month: u32,
    pub month_operational_rate: f64,
    pub month_disponibility_rate: f64,
    pub overall_lost_rate: f64,
    pub overall_indisponibility_lost_rate: f64,
    /// `None` when the month had no scoreable sample.
    pub month_max: Option<f64>,
    /// Valid (A/O/R/P) samples seen this month.
    pub month_valid_count: u64,
    /// Valid plus degraded (C/Z/M) samples seen this month.
    pub month_disponibility_count: u64,
    pub state: AccumulationState,
}

/// Derives the month's rates and the next accumulation state.
///
/// Pure: the same `(counts, prior)` always yields the same result. Fails
/// with [`RateError::CorruptSource`] when the month has no sample at all,
/// in which case no new state exists.
pub fn calculate(
    key: &SeriesKey,
    month: u32,
    counts: &MonthCounts,
    prior: &AccumulationState,
) -> Result<MonthlyRateResult, RateError> {
    if counts.month_sample_count == 0 {
        return Err(RateError::CorruptSource {
            site: key.site.clone(),
            measurement_id: key.measurement_id.clone(),
            month,
        });
    }

    let month_count = counts.month_sample_count as f64;
    let valid = counts.valid();
    let disponibility_set = counts.disponibility_set();

    // The -1 is carried over unchanged from the historical computation; it
    // pairs with the seed of 2 and has no documented meaning.
    let state = AccumulationState {
        accumulated_valid_count: prior.accumulated_valid_count + counts.month_sample_count - 1,
        accumulated_lost_count: prior.accumulated_lost_count + counts.lost(),
        accumulated_indisponibility_lost_count: prior.accumulated_indisponibility_lost_count
            + counts.indisponibility_lost(),
    };

    Ok(MonthlyRateResult {
        month,
        month_operational_rate: valid as f64 / month_count,
        month_disponibility_rate: disponibility_set as f64 / month_count,
        overall_lost_rate: state.accumulated_lost_count as f64 / LOST_RATE_DENOMINATOR,
        overall_indisponibility_lost_rate: state.accumulated_indisponibility_lost_count as f64
            / INDISPONIBILITY_LOST_RATE_DENOMINATOR,
        month_max: counts.month_max,
        month_valid_count: valid,
        month_disponibility_count: disponibility_set,
        state,
    })
}
