//! What a classification run hands back to its caller.

use std::time::Duration;

use lumen_core::{LabeledPrediction, PredictionList};
use serde::{Serialize, Serializer};

/// Summary of the per-repetition latencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    #[serde(serialize_with = "as_millis")]
    pub min: Duration,
    #[serde(serialize_with = "as_millis")]
    pub max: Duration,
    #[serde(serialize_with = "as_millis")]
    pub mean: Duration,
    /// Mean of the two middle samples when the count is even.
    #[serde(serialize_with = "as_millis")]
    pub median: Duration,
}

impl LatencyStats {
    /// `None` when there are no samples.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        let total: Duration = sorted.iter().sum();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2
        } else {
            sorted[mid]
        };
        Some(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: total / sorted.len() as u32,
            median,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassificationReport {
    /// Model input the tensor was bound to.
    pub input_name: String,
    /// Model output the scores were read from.
    pub output_name: String,
    #[serde(serialize_with = "all_as_millis")]
    pub latencies: Vec<Duration>,
    pub stats: LatencyStats,
    pub predictions: PredictionList,
    /// Same order as `predictions`; labels are `None` without a label table.
    pub labeled: Vec<LabeledPrediction>,
}

fn as_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() * 1_000.0)
}

fn all_as_millis<S: Serializer>(values: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|value| value.as_secs_f64() * 1_000.0))
}
