//! Backend selection: one validated request, one live session.

pub mod mode;
#[cfg(not(target_env = "musl"))]
pub mod engine;
#[cfg(target_env = "musl")]
mod engine_stub;

use std::path::Path;

use lumen_core::LumenResult;
use tracing::info;

pub use mode::{BackendMode, BackendRequest, ExecutionTarget, DEFAULT_DEVICE};
#[cfg(not(target_env = "musl"))]
pub use engine::OrtSession;
#[cfg(target_env = "musl")]
pub use engine_stub::OrtSession;

/// Bind a session for `request` and load the model once.
///
/// The request was validated when it was built, so the only failures here
/// are a missing model file or the engine refusing it.
pub fn select(request: &BackendRequest, model_path: impl AsRef<Path>) -> LumenResult<OrtSession> {
    let target = request.target();
    info!(
        mode = %request.mode(),
        device_id = request.device_id(),
        %target,
        model = %model_path.as_ref().display(),
        "selecting inference backend"
    );
    OrtSession::load(model_path, target)
}
