// Rate accumulation and outlier detection engine
//
// Everything in here is pure and synchronous: no I/O, no shared state.
// One measurement series goes through classifier -> rate_calculator once
// per month (driven by annual_accumulator), and through outlier_detector
// once over its full span.

pub mod annual_accumulator;
pub mod classifier;
pub mod metric;
pub mod outlier_detector;
pub mod rate_calculator;
pub mod sample;

pub use annual_accumulator::{accumulate, slice_months, AnnualRateReport, MonthSlice, SummaryPolicy};
pub use classifier::{classify, MonthCounts};
pub use metric::RateMetric;
pub use outlier_detector::detect;
pub use rate_calculator::{calculate, AccumulationState, MonthlyRateResult};
pub use sample::{Sample, SeriesKey, StateBucket, StateCode};
