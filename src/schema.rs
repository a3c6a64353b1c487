use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;
use crate::stats::{StatsError, Summary};

/// Result of timing one implementation. Derived fields are computed from `timings` at
/// construction and cannot be set independently.
#[derive(Clone, Debug, PartialEq)]
pub struct StatisticsRecord {
    task: String,
    slug: String,
    description: String,
    timings: Vec<f64>,
    summary: Summary,
}

impl StatisticsRecord {
    pub fn new(
        task: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
        timings: Vec<f64>,
    ) -> Result<Self, StatsError> {
        let summary = Summary::from_samples(&timings)?;
        Ok(Self {
            task: task.into(),
            slug: slug.into(),
            description: description.into(),
            timings,
            summary,
        })
    }

    pub fn for_descriptor(d: &Descriptor, timings: Vec<f64>) -> Result<Self, StatsError> {
        Self::new(d.task, d.slug, d.description, timings)
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn iterations(&self) -> usize {
        self.timings.len()
    }

    /// Per-iteration wall-clock durations in seconds, in execution order.
    pub fn timings(&self) -> &[f64] {
        &self.timings
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn to_row(&self) -> ReportRow {
        let s = &self.summary;
        ReportRow {
            task: self.task.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            iterations: self.iterations(),
            mean: s.mean,
            median: s.median,
            std_dev: s.std_dev,
            min: s.min,
            max: s.max,
            total: s.total,
            times: self.timings.clone(),
        }
    }
}

/// Serialized form of a [`StatisticsRecord`]; field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub task: String,
    pub slug: String,
    pub description: String,
    pub iterations: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
    pub times: Vec<f64>,
}
