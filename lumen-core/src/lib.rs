//! Core domain types shared by every Lumen crate.

pub mod error;
pub mod prediction;
pub mod raster;
pub mod session;
pub mod tensor;

pub use error::{BoxError, LumenError, LumenResult};
pub use prediction::{LabeledPrediction, Prediction, PredictionList};
pub use raster::{decode_image, DecodedImage, Size};
pub use session::InferenceSession;
pub use tensor::{PreprocessedTensor, RawOutput, SessionOutputs, TensorDescriptor};
