//! The classification pipeline: preprocess once, run the model a fixed
//! number of times, rank the last output.

pub mod report;

use std::path::Path;
use std::time::{Duration, Instant};

use lumen_backend::BackendRequest;
use lumen_core::{decode_image, DecodedImage, InferenceSession, LumenError, LumenResult, Size};
use lumen_preprocess::{Preprocessor, ResizeFilter};
use lumen_rank::{top_k, ClassLabels};
use tracing::{debug, info};

pub use report::{ClassificationReport, LatencyStats};

/// Knobs of one pipeline instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub target_size: Size,
    pub crop_size: Size,
    pub filter: ResizeFilter,
    pub top_k: usize,
    pub repetitions: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_size: Size::square(256),
            crop_size: Size::square(224),
            filter: ResizeFilter::default(),
            top_k: 5,
            repetitions: 10,
        }
    }
}

impl PipelineConfig {
    /// Check every field and build the preprocessor they describe.
    pub fn validate(&self) -> LumenResult<Preprocessor> {
        let preprocessor = Preprocessor::new(self.target_size, self.crop_size, self.filter)?;
        if self.top_k == 0 {
            return Err(LumenError::InvalidPipelineConfiguration(
                "top_k must be at least 1".into(),
            ));
        }
        if self.repetitions == 0 {
            return Err(LumenError::InvalidPipelineConfiguration(
                "repetitions must be at least 1".into(),
            ));
        }
        Ok(preprocessor)
    }
}

pub struct Pipeline<S> {
    session: S,
    preprocessor: Preprocessor,
    config: PipelineConfig,
    labels: Option<ClassLabels>,
}

impl<S: InferenceSession> Pipeline<S> {
    pub fn new(session: S, config: PipelineConfig) -> LumenResult<Self> {
        let preprocessor = config.validate()?;
        Ok(Self {
            session,
            preprocessor,
            config,
            labels: None,
        })
    }

    /// Attach a class-name table used to annotate predictions.
    pub fn with_labels(mut self, labels: ClassLabels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Decode `path` and classify it.
    pub fn classify_path(&mut self, path: impl AsRef<Path>) -> LumenResult<ClassificationReport> {
        let image = decode_image(path)?;
        self.classify(&image)
    }

    pub fn classify(&mut self, image: &DecodedImage) -> LumenResult<ClassificationReport> {
        let tensor = self.preprocessor.apply(image)?;
        debug!(
            height = tensor.height(),
            width = tensor.width(),
            "input tensor ready"
        );
        let input_name = self
            .session
            .primary_input()
            .map(str::to_string)
            .ok_or_else(|| LumenError::engine("binding input", "model declares no inputs"))?;

        let mut latencies = Vec::with_capacity(self.config.repetitions);
        let mut last = None;
        for repetition in 0..self.config.repetitions {
            let started = Instant::now();
            let outputs = self.session.run(&[(input_name.as_str(), &tensor)])?;
            let elapsed = started.elapsed();
            debug!(
                repetition,
                elapsed_ms = elapsed.as_secs_f64() * 1_000.0,
                "forward pass"
            );
            latencies.push(elapsed);
            last = Some(outputs);
        }

        let outputs = last.ok_or_else(|| {
            LumenError::InvalidPipelineConfiguration("no forward pass was run".into())
        })?;
        let first = outputs.first().ok_or_else(|| {
            LumenError::InvalidPipelineConfiguration("session returned no outputs".into())
        })?;
        let scores = first.flattened();
        if scores.is_empty() {
            return Err(LumenError::InvalidPipelineConfiguration(format!(
                "output '{}' is empty",
                first.name
            )));
        }
        let predictions = top_k(scores, self.config.top_k)?;
        let labeled = self
            .labels
            .as_ref()
            .map(|labels| labels.annotate(&predictions))
            .unwrap_or_else(|| ClassLabels::default().annotate(&predictions));
        let stats = summarize(&latencies)?;

        info!(
            input = %input_name,
            output = %first.name,
            repetitions = latencies.len(),
            mean_ms = stats.mean.as_secs_f64() * 1_000.0,
            top = ?predictions.first().map(|p| p.index),
            "classification finished"
        );

        Ok(ClassificationReport {
            input_name,
            output_name: first.name.clone(),
            latencies,
            stats,
            predictions,
            labeled,
        })
    }
}

fn summarize(latencies: &[Duration]) -> LumenResult<LatencyStats> {
    LatencyStats::from_samples(latencies).ok_or_else(|| {
        LumenError::InvalidPipelineConfiguration("no latency samples were recorded".into())
    })
}

/// Validate, select the backend, decode and classify.
///
/// Configuration problems surface before the model is touched, and a bad
/// image surfaces after the model load, matching the order of the steps.
pub fn run_from_paths(
    request: &BackendRequest,
    model_path: impl AsRef<Path>,
    image_path: impl AsRef<Path>,
    config: PipelineConfig,
    labels: Option<ClassLabels>,
) -> LumenResult<ClassificationReport> {
    config.validate()?;
    let session = lumen_backend::select(request, model_path)?;
    let mut pipeline = Pipeline::new(session, config)?;
    if let Some(labels) = labels {
        pipeline = pipeline.with_labels(labels);
    }
    pipeline.classify_path(image_path)
}
