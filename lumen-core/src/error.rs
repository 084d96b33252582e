//! Failure taxonomy for the classification pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::raster::Size;

/// Boxed error used to carry engine failures without reinterpreting them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the workspace.
pub type LumenResult<T> = Result<T, LumenError>;

/// Failure variants surfaced by the pipeline. All of them are fatal.
#[derive(Debug, Error)]
pub enum LumenError {
    /// Unknown backend mode or a device id the mode cannot accept.
    #[error("invalid backend configuration: {0}")]
    InvalidBackendConfiguration(String),
    /// The input image could not be read or decoded.
    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The crop window does not fit inside the resize target.
    #[error("invalid crop configuration: crop {crop} does not fit target {target}")]
    InvalidCropConfiguration { target: Size, crop: Size },
    /// `k` is zero or larger than the number of scores.
    #[error("invalid top-k request: k = {k} for {len} scores")]
    InvalidTopKRequest { k: usize, len: usize },
    /// Anything raised by the inference engine, passed through untouched.
    #[error("inference engine error: {context}")]
    InferenceEngine {
        context: String,
        #[source]
        source: BoxError,
    },
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),
    /// The requested backend is not compiled into this build.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("invalid pipeline configuration: {0}")]
    InvalidPipelineConfiguration(String),
    #[error("failed to read class labels from {}: {source}", path.display())]
    Labels {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LumenError {
    /// Wrap an engine failure with a short description of the failing step.
    pub fn engine(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::InferenceEngine {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn invalid_backend(msg: impl Into<String>) -> Self {
        Self::InvalidBackendConfiguration(msg.into())
    }
}
