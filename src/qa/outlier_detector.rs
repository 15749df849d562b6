/// Z-score outlier detection over the scored samples of a series.
///
/// Independent of the monthly pipeline: it may run over any time span and
/// never touches accumulation state.
use tracing::debug;

use super::sample::Sample;

/// Threshold used when the caller does not choose one.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 1.5;

/// Threshold used by the batch report flow.
pub const REPORT_OUTLIER_THRESHOLD: f64 = 5.0;

/// Mean and population standard deviation of a value set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub std_dev: f64,
}

impl Moments {
    /// `None` with fewer than two values.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Returns every scored sample whose |z-score| exceeds `threshold`.
///
/// Only A/O/R samples with a finite value take part, both in the moments
/// and in the result. Fewer than two such samples, or zero variance, yield
/// no outlier rather than an error. Result order follows input order.
pub fn detect(series: &[Sample], threshold: f64) -> Vec<Sample> {
    let scored: Vec<(&Sample, f64)> = series
        .iter()
        .filter_map(|s| s.scored_value().map(|v| (s, v)))
        .collect();

    let values: Vec<f64> = scored.iter().map(|(_, v)| *v).collect();
    let moments = match Moments::of(&values) {
        Some(m) if m.std_dev > 0.0 => m,
        _ => {
            debug!(scored = values.len(), "Degenerate series, no outlier computed");
            return Vec::new();
        }
    };

    scored
        .into_iter()
        .filter(|(_, v)| moments.z_score(*v).abs() > threshold)
        .map(|(s, _)| s.clone())
        .collect()
}
