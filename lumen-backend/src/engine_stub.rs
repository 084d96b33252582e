use std::path::Path;

use lumen_core::{
    InferenceSession, LumenError, LumenResult, PreprocessedTensor, SessionOutputs,
    TensorDescriptor,
};

use crate::mode::ExecutionTarget;

/// Placeholder session used when building on targets ONNX Runtime does not ship for (musl).
#[derive(Debug)]
pub struct OrtSession;

impl OrtSession {
    /// Always fails; a missing model is still reported as such.
    pub fn load(model_path: impl AsRef<Path>, _target: ExecutionTarget) -> LumenResult<Self> {
        let path = model_path.as_ref();
        if !path.is_file() {
            return Err(LumenError::ModelNotFound(path.to_path_buf()));
        }
        Err(LumenError::BackendUnavailable(
            "ONNX Runtime is unavailable on musl targets; build with glibc".into(),
        ))
    }
}

impl InferenceSession for OrtSession {
    fn inputs(&self) -> &[TensorDescriptor] {
        &[]
    }

    fn run(&mut self, _feeds: &[(&str, &PreprocessedTensor)]) -> LumenResult<SessionOutputs> {
        Err(LumenError::BackendUnavailable(
            "inference is not supported on musl targets".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_reports_missing_model_then_unavailability() {
        let dir = tempdir().unwrap();
        let model = dir.path().join("model.onnx");
        assert!(matches!(
            OrtSession::load(&model, ExecutionTarget::Onboard),
            Err(LumenError::ModelNotFound(_))
        ));
        std::fs::write(&model, b"placeholder").unwrap();
        assert!(matches!(
            OrtSession::load(&model, ExecutionTarget::Onboard),
            Err(LumenError::BackendUnavailable(_))
        ));
    }
}
