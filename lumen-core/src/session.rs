//! The capability every inference backend exposes.

use crate::error::LumenResult;
use crate::tensor::{PreprocessedTensor, SessionOutputs, TensorDescriptor};

/// A loaded model bound to one execution target for its whole lifetime.
///
/// `run` takes `&mut self` because engines need exclusive access per call;
/// concurrent callers each own a session.
pub trait InferenceSession: Send {
    /// Inputs the model declares, in declaration order.
    fn inputs(&self) -> &[TensorDescriptor];

    /// Execute one forward pass over the named feeds.
    fn run(&mut self, feeds: &[(&str, &PreprocessedTensor)]) -> LumenResult<SessionOutputs>;

    /// Name of the first declared input, which the pipeline always binds.
    fn primary_input(&self) -> Option<&str> {
        self.inputs().first().map(|input| input.name.as_str())
    }
}

impl<S: InferenceSession + ?Sized> InferenceSession for Box<S> {
    fn inputs(&self) -> &[TensorDescriptor] {
        (**self).inputs()
    }

    fn run(&mut self, feeds: &[(&str, &PreprocessedTensor)]) -> LumenResult<SessionOutputs> {
        (**self).run(feeds)
    }
}
