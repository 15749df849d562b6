/// Errors that abort the processing of one measurement series.
///
/// They never abort a whole batch: the service logs them with the series
/// context and moves on to the next series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("Corrupted or incomplete source for site {site}, measurement {measurement_id}: month {month} has no samples")]
    CorruptSource {
        site: String,
        measurement_id: String,
        month: u32,
    },
    #[error("No month to process for site {site}, measurement {measurement_id}")]
    EmptyWindow { site: String, measurement_id: String },
}
