//! Summary statistics over per-iteration timings (seconds).

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot summarize an empty sample")]
    EmptySample,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (divisor `n - 1`); exactly 0.0 for a single sample.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

impl Summary {
    pub fn from_samples(samples: &[f64]) -> Result<Self, StatsError> {
        if samples.is_empty() {
            return Err(StatsError::EmptySample);
        }

        let n = samples.len() as f64;
        let total: f64 = samples.iter().sum();
        let mean = total / n;
        let median = median(samples);

        let std_dev = if samples.len() < 2 {
            0.0
        } else {
            let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        };

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            mean,
            median,
            std_dev,
            min,
            max,
            total,
        })
    }
}

/// Middle value; mean of the two middle values for even lengths. `samples` must be non-empty.
fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
