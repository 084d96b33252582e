//! Class index to name lookup.

use std::fs;
use std::path::Path;

use lumen_core::{LabeledPrediction, LumenError, LumenResult, PredictionList};
use tracing::debug;

/// Human-readable class names, indexed by class id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// One label per line; line `i` names class `i`. Blank lines keep their
    /// position but resolve to no label.
    pub fn parse(contents: &str) -> Self {
        Self::new(contents.lines().map(|line| line.trim().to_string()).collect())
    }

    pub fn load(path: impl AsRef<Path>) -> LumenResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LumenError::Labels {
            path: path.to_path_buf(),
            source,
        })?;
        let labels = Self::parse(&contents);
        debug!(path = %path.display(), classes = labels.len(), "loaded class labels");
        Ok(labels)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attach names to ranked predictions, keeping their order.
    pub fn annotate(&self, predictions: &PredictionList) -> Vec<LabeledPrediction> {
        predictions
            .iter()
            .map(|p| LabeledPrediction {
                index: p.index,
                score: p.score,
                label: self.label(p.index).map(str::to_string),
            })
            .collect()
    }
}
