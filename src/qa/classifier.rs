/// Sample classification for one month of one measurement series.
use tracing::debug;

use super::sample::{Sample, StateBucket, StateCode};

/// Per-state-code counts for one month slice, plus the month denominator and maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCounts {
    counts: [u64; StateCode::ALL.len()],
    /// Every sample in the slice, whatever its state.
    pub month_sample_count: u64,
    /// Largest scored value in the slice, `None` when nothing was scoreable.
    pub month_max: Option<f64>,
}

impl MonthCounts {
    /// Builds counts directly from `(code, count)` pairs.
    ///
    /// The month sample count is the sum of all pairs.
    pub fn with_counts(pairs: &[(StateCode, u64)]) -> Self {
        let mut counts = [0; StateCode::ALL.len()];
        for (code, n) in pairs {
            counts[index_of(*code)] += n;
        }
        let month_sample_count = counts.iter().sum();
        Self {
            counts,
            month_sample_count,
            month_max: None,
        }
    }

    pub fn with_max(mut self, month_max: Option<f64>) -> Self {
        self.month_max = month_max;
        self
    }

    pub fn count(&self, code: StateCode) -> u64 {
        self.counts[index_of(code)]
    }

    fn bucket_total(&self, bucket: StateBucket) -> u64 {
        StateCode::ALL
            .iter()
            .filter(|c| c.bucket() == bucket)
            .map(|c| self.count(*c))
            .sum()
    }

    /// A + O + R + P
    pub fn valid(&self) -> u64 {
        self.bucket_total(StateBucket::Valid)
    }

    /// C + Z + M
    pub fn disponibility_only(&self) -> u64 {
        self.bucket_total(StateBucket::DisponibilityOnly)
    }

    /// D + N + I
    pub fn indisponibility_lost(&self) -> u64 {
        self.bucket_total(StateBucket::IndisponibilityLost)
    }

    /// Samples counted toward disponibility: valid plus degraded.
    pub fn disponibility_set(&self) -> u64 {
        self.valid() + self.disponibility_only()
    }

    /// Degraded plus unavailable samples.
    pub fn lost(&self) -> u64 {
        self.disponibility_only() + self.indisponibility_lost()
    }
}

// `StateCode::ALL` lists the variants in declaration order.
fn index_of(code: StateCode) -> usize {
    code as usize
}

/// Counts the samples of one month slice per state code.
///
/// Never fails: an empty slice yields all-zero counts, and it is up to the
/// rate calculator to reject a zero denominator.
pub fn classify(samples: &[Sample]) -> MonthCounts {
    let mut counts = [0; StateCode::ALL.len()];
    let mut month_max: Option<f64> = None;

    for sample in samples {
        counts[index_of(sample.state)] += 1;
        if let Some(v) = sample.scored_value() {
            month_max = Some(month_max.map_or(v, |m| m.max(v)));
        }
    }

    if month_max.is_none() && !samples.is_empty() {
        debug!(samples = samples.len(), "No scoreable sample in month, maximum undefined");
    }

    MonthCounts {
        counts,
        month_sample_count: samples.len() as u64,
        month_max,
    }
}
