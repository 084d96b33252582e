//! ONNX Runtime sessions bound to one execution target.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use half::{bf16, f16};
use lumen_core::{
    InferenceSession, LumenError, LumenResult, PreprocessedTensor, RawOutput, SessionOutputs,
    TensorDescriptor,
};
use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};
use ort::session::{Session, SessionInputValue};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, TensorRef, ValueType};
use tracing::{info, warn};

use crate::mode::ExecutionTarget;

/// A loaded ONNX model. The execution target is fixed at load time.
pub struct OrtSession {
    session: Session,
    inputs: Vec<TensorDescriptor>,
    /// First declared output; the only one extracted per run.
    scores: ScoreOutput,
    target: ExecutionTarget,
    model_path: PathBuf,
}

impl fmt::Debug for OrtSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrtSession")
            .field("inputs", &self.inputs)
            .field("scores", &self.scores)
            .field("target", &self.target)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OrtSession {
    /// Load `model_path` with the execution providers of `target`.
    pub fn load(model_path: impl AsRef<Path>, target: ExecutionTarget) -> LumenResult<Self> {
        let path = model_path.as_ref();
        if !path.is_file() {
            return Err(LumenError::ModelNotFound(path.to_path_buf()));
        }
        let providers = execution_providers(target)?;

        let started = Instant::now();
        let builder = Session::builder()
            .map_err(|err| engine_error("failed to create session builder", err))?;
        let builder = builder
            .with_execution_providers(providers)
            .map_err(|err| engine_error(format!("failed to register providers for {target}"), err))?;
        let session = builder.commit_from_file(path).map_err(|err| {
            engine_error(format!("failed to load model {}", path.display()), err)
        })?;

        let inputs: Vec<TensorDescriptor> = session
            .inputs
            .iter()
            .map(|input| describe(&input.name, &input.input_type))
            .collect();
        let scores = primary_output(
            session
                .outputs
                .iter()
                .map(|output| (output.name.as_str(), element_type(&output.output_type))),
        )?;

        info!(
            model = %path.display(),
            %target,
            inputs = inputs.len(),
            outputs = session.outputs.len(),
            scores = %scores.name,
            dtype = ?scores.kind,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model loaded"
        );

        Ok(Self {
            session,
            inputs,
            scores,
            target,
            model_path: path.to_path_buf(),
        })
    }
}

impl InferenceSession for OrtSession {
    fn inputs(&self) -> &[TensorDescriptor] {
        &self.inputs
    }

    fn run(&mut self, feeds: &[(&str, &PreprocessedTensor)]) -> LumenResult<SessionOutputs> {
        let mut values: Vec<(String, SessionInputValue<'_>)> = Vec::with_capacity(feeds.len());
        for (name, tensor) in feeds {
            let value = TensorRef::from_array_view(tensor.view()).map_err(|err| {
                engine_error(
                    format!("failed to bind input '{name}' with shape {:?}", tensor.shape()),
                    err,
                )
            })?;
            values.push((name.to_string(), value.into()));
        }

        let outputs = self.session.run(values).map_err(|err| {
            engine_error(
                format!("forward pass of {} failed", self.model_path.display()),
                err,
            )
        })?;

        let name = self.scores.name.as_str();
        let (shape, data) = extract_scores(&outputs[name], self.scores.kind)
            .map_err(|err| engine_error(format!("failed to extract output '{name}'"), err))?;
        Ok(SessionOutputs::new(vec![RawOutput::new(name, shape, data)]))
    }
}

/// Element types accepted for the score output. All are widened to `f32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScoreKind {
    Float32,
    Float64,
    Float16,
    Bfloat16,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

impl ScoreKind {
    fn of(ty: TensorElementType) -> Option<Self> {
        Some(match ty {
            TensorElementType::Float32 => Self::Float32,
            TensorElementType::Float64 => Self::Float64,
            TensorElementType::Float16 => Self::Float16,
            TensorElementType::Bfloat16 => Self::Bfloat16,
            TensorElementType::Int8 => Self::Int8,
            TensorElementType::Int16 => Self::Int16,
            TensorElementType::Int32 => Self::Int32,
            TensorElementType::Int64 => Self::Int64,
            TensorElementType::Uint8 => Self::Uint8,
            TensorElementType::Uint16 => Self::Uint16,
            TensorElementType::Uint32 => Self::Uint32,
            TensorElementType::Uint64 => Self::Uint64,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ScoreOutput {
    name: String,
    kind: ScoreKind,
}

/// Pick the first declared output. `None` marks a non-tensor output.
fn primary_output<'a>(
    outputs: impl IntoIterator<Item = (&'a str, Option<TensorElementType>)>,
) -> LumenResult<ScoreOutput> {
    let (name, ty) = outputs
        .into_iter()
        .next()
        .ok_or_else(|| LumenError::engine("selecting score output", "model declares no outputs"))?;
    let ty = ty.ok_or_else(|| {
        LumenError::engine(
            "selecting score output",
            format!("first output '{name}' is not a tensor"),
        )
    })?;
    let kind = ScoreKind::of(ty).ok_or_else(|| {
        LumenError::engine(
            "selecting score output",
            format!("first output '{name}' has non-numeric element type {ty:?}"),
        )
    })?;
    Ok(ScoreOutput {
        name: name.to_string(),
        kind,
    })
}

/// Borrowed output data of any accepted element type.
enum ScoreSlice<'a> {
    Float32(&'a [f32]),
    Float64(&'a [f64]),
    Float16(&'a [f16]),
    Bfloat16(&'a [bf16]),
    Int8(&'a [i8]),
    Int16(&'a [i16]),
    Int32(&'a [i32]),
    Int64(&'a [i64]),
    Uint8(&'a [u8]),
    Uint16(&'a [u16]),
    Uint32(&'a [u32]),
    Uint64(&'a [u64]),
}

impl ScoreSlice<'_> {
    fn widen(&self) -> Vec<f32> {
        match self {
            Self::Float32(data) => data.to_vec(),
            Self::Float64(data) => data.iter().map(|&v| v as f32).collect(),
            Self::Float16(data) => data.iter().map(|v| v.to_f32()).collect(),
            Self::Bfloat16(data) => data.iter().map(|v| v.to_f32()).collect(),
            Self::Int8(data) => data.iter().map(|&v| f32::from(v)).collect(),
            Self::Int16(data) => data.iter().map(|&v| f32::from(v)).collect(),
            Self::Int32(data) => data.iter().map(|&v| v as f32).collect(),
            Self::Int64(data) => data.iter().map(|&v| v as f32).collect(),
            Self::Uint8(data) => data.iter().map(|&v| f32::from(v)).collect(),
            Self::Uint16(data) => data.iter().map(|&v| f32::from(v)).collect(),
            Self::Uint32(data) => data.iter().map(|&v| v as f32).collect(),
            Self::Uint64(data) => data.iter().map(|&v| v as f32).collect(),
        }
    }
}

fn extract_scores(value: &DynValue, kind: ScoreKind) -> ort::Result<(Vec<i64>, Vec<f32>)> {
    macro_rules! widen {
        ($ty:ty, $variant:ident) => {{
            let (shape, data) = value.try_extract_tensor::<$ty>()?;
            (shape.iter().copied().collect(), ScoreSlice::$variant(data).widen())
        }};
    }
    Ok(match kind {
        ScoreKind::Float32 => widen!(f32, Float32),
        ScoreKind::Float64 => widen!(f64, Float64),
        ScoreKind::Float16 => widen!(f16, Float16),
        ScoreKind::Bfloat16 => widen!(bf16, Bfloat16),
        ScoreKind::Int8 => widen!(i8, Int8),
        ScoreKind::Int16 => widen!(i16, Int16),
        ScoreKind::Int32 => widen!(i32, Int32),
        ScoreKind::Int64 => widen!(i64, Int64),
        ScoreKind::Uint8 => widen!(u8, Uint8),
        ScoreKind::Uint16 => widen!(u16, Uint16),
        ScoreKind::Uint32 => widen!(u32, Uint32),
        ScoreKind::Uint64 => widen!(u64, Uint64),
    })
}

fn engine_error(context: impl Into<String>, err: impl fmt::Display) -> LumenError {
    LumenError::engine(context, err.to_string())
}

fn element_type(value_type: &ValueType) -> Option<TensorElementType> {
    match value_type {
        ValueType::Tensor { ty, .. } => Some(*ty),
        _ => None,
    }
}

fn describe(name: &str, value_type: &ValueType) -> TensorDescriptor {
    match value_type {
        ValueType::Tensor { ty, shape, .. } => TensorDescriptor::new(
            name,
            shape.iter().copied().collect(),
            format!("{ty:?}").to_lowercase(),
        ),
        other => TensorDescriptor::new(name, Vec::new(), format!("{other:?}").to_lowercase()),
    }
}

fn execution_providers(target: ExecutionTarget) -> LumenResult<Vec<ExecutionProviderDispatch>> {
    let cpu = CPUExecutionProvider::default().build();
    match target {
        ExecutionTarget::Auto { hint: None } => Ok(vec![cpu]),
        ExecutionTarget::Auto {
            hint: Some(device_id),
        } => {
            let mut providers = accelerator_providers(device_id);
            if providers.is_empty() {
                warn!(
                    device_id,
                    "no accelerator compiled in, running on the default target"
                );
            }
            providers.push(cpu);
            Ok(providers)
        }
        ExecutionTarget::Onboard => {
            let mut providers = onboard_providers();
            providers.push(cpu);
            Ok(providers)
        }
        ExecutionTarget::Discrete { device_id } => {
            let providers = accelerator_providers(device_id);
            if providers.is_empty() {
                return Err(LumenError::BackendUnavailable(
                    "discrete backend needs the `cuda` or `tensorrt` feature".into(),
                ));
            }
            Ok(providers
                .into_iter()
                .map(ExecutionProviderDispatch::error_on_failure)
                .collect())
        }
    }
}

#[cfg_attr(
    not(any(feature = "cuda", feature = "tensorrt")),
    allow(unused_variables, unused_mut)
)]
fn accelerator_providers(device_id: i32) -> Vec<ExecutionProviderDispatch> {
    let mut providers = Vec::new();
    #[cfg(feature = "tensorrt")]
    providers.push(
        ort::execution_providers::TensorRTExecutionProvider::default()
            .with_device_id(device_id)
            .build(),
    );
    #[cfg(feature = "cuda")]
    providers.push(
        ort::execution_providers::CUDAExecutionProvider::default()
            .with_device_id(device_id)
            .build(),
    );
    providers
}

#[cfg_attr(not(feature = "coreml"), allow(unused_mut))]
fn onboard_providers() -> Vec<ExecutionProviderDispatch> {
    let mut providers = Vec::new();
    #[cfg(feature = "coreml")]
    providers.push(ort::execution_providers::CoreMLExecutionProvider::default().build());
    providers
}
