use std::sync::Arc;

use parking_lot::Mutex;

use lumen_core::{
    InferenceSession, LumenError, LumenResult, PreprocessedTensor, RawOutput, SessionOutputs,
    TensorDescriptor,
};

/// What one `run` call received.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub input_names: Vec<String>,
    pub shapes: Vec<[usize; 4]>,
}

/// In-memory session returning scripted outputs.
///
/// Clones share state, so a test can keep a clone as a probe after the
/// session has been moved into a pipeline.
#[derive(Clone)]
pub struct MockSession {
    inputs: Vec<TensorDescriptor>,
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    outputs: SessionOutputs,
    fail_on_call: Option<usize>,
    calls: Vec<RecordedCall>,
}

impl MockSession {
    pub fn new(inputs: Vec<TensorDescriptor>, outputs: SessionOutputs) -> Self {
        Self {
            inputs,
            state: Arc::new(Mutex::new(MockState {
                outputs,
                fail_on_call: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Single `u8` NHWC input named `input`, single `logits` output holding `scores`.
    pub fn classifier(scores: Vec<f32>) -> Self {
        let classes = scores.len() as i64;
        Self::new(
            vec![TensorDescriptor::new("input", vec![1, 224, 224, 3], "uint8")],
            SessionOutputs::new(vec![RawOutput::new("logits", vec![1, classes], scores)]),
        )
    }

    /// Replace the declared inputs.
    pub fn with_inputs(mut self, inputs: Vec<TensorDescriptor>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Make the `n`th call (1-based) fail with an engine error.
    pub fn fail_on_call(self, n: usize) -> Self {
        self.state.lock().fail_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }
}

impl InferenceSession for MockSession {
    fn inputs(&self) -> &[TensorDescriptor] {
        &self.inputs
    }

    fn run(&mut self, feeds: &[(&str, &PreprocessedTensor)]) -> LumenResult<SessionOutputs> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            input_names: feeds.iter().map(|(name, _)| name.to_string()).collect(),
            shapes: feeds.iter().map(|(_, tensor)| tensor.shape()).collect(),
        });
        if state.fail_on_call == Some(state.calls.len()) {
            return Err(LumenError::engine(
                "mock forward pass",
                format!("scripted failure on call {}", state.calls.len()),
            ));
        }
        Ok(state.outputs.clone())
    }
}
