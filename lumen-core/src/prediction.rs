//! Ranked classification results.

use std::ops::Deref;

use serde::Serialize;

/// A class index paired with the score the model gave it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub index: usize,
    pub score: f32,
}

impl Prediction {
    pub fn new(index: usize, score: f32) -> Self {
        Self { index, score }
    }
}

/// Predictions ordered by descending score, ties by ascending index.
///
/// Only the ranker builds these, so the ordering always holds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionList {
    items: Vec<Prediction>,
}

impl PredictionList {
    /// Wrap predictions that are already ranked.
    pub fn from_ranked(items: Vec<Prediction>) -> Self {
        Self { items }
    }

    pub fn indices(&self) -> Vec<usize> {
        self.items.iter().map(|p| p.index).collect()
    }

    pub fn scores(&self) -> Vec<f32> {
        self.items.iter().map(|p| p.score).collect()
    }
}

impl Deref for PredictionList {
    type Target = [Prediction];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<'a> IntoIterator for &'a PredictionList {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A prediction with its human-readable class name, when one is known.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabeledPrediction {
    pub index: usize,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LabeledPrediction {
    /// Label for display; unknown classes render as `Unknown(<index>)`.
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Unknown({})", self.index))
    }
}
