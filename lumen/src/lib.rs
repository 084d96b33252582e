//! Lumen: deterministic image classification on ONNX models.
//!
//! ```no_run
//! use lumen::{run_from_paths, BackendRequest, PipelineConfig};
//!
//! let request = BackendRequest::parse("auto", -1)?;
//! let report = run_from_paths(
//!     &request,
//!     "models/classifier.onnx",
//!     "images/sample.jpg",
//!     PipelineConfig::default(),
//!     None,
//! )?;
//! for prediction in report.predictions.iter() {
//!     println!("Class Index: {}, Score: {}", prediction.index, prediction.score);
//! }
//! # Ok::<(), lumen::LumenError>(())
//! ```

pub use lumen_backend as backend;
pub use lumen_config as config;
pub use lumen_core as domain;
pub use lumen_pipeline as pipeline;
pub use lumen_preprocess as preprocess;
pub use lumen_rank as rank;

pub use lumen_backend::{select, BackendMode, BackendRequest, ExecutionTarget, OrtSession};
pub use lumen_core::{
    decode_image, DecodedImage, InferenceSession, LumenError, LumenResult, Prediction,
    PredictionList, PreprocessedTensor, Size,
};
pub use lumen_pipeline::{run_from_paths, ClassificationReport, Pipeline, PipelineConfig};
pub use lumen_preprocess::{preprocess, Preprocessor, ResizeFilter};
pub use lumen_rank::{top_k, ClassLabels};
