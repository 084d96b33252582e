//! Layered configuration loading utilities.

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use lumen_core::Size;
use lumen_preprocess::ResizeFilter;
use serde::Deserialize;

/// Root application configuration deserialized from layered sources.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_image_path")]
    pub image_path: PathBuf,
    #[serde(default)]
    pub labels_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub preprocess: PreprocessSettings,
    #[serde(default)]
    pub inference: InferenceSettings,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PreprocessSettings {
    #[serde(default = "default_target_size")]
    pub target_size: Size,
    #[serde(default = "default_crop_size")]
    pub crop_size: Size,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct InferenceSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Number of timed forward passes; the last one is ranked.
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            image_path: default_image_path(),
            labels_path: None,
            log_level: default_log_level(),
            preprocess: PreprocessSettings::default(),
            inference: InferenceSettings::default(),
        }
    }
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            crop_size: default_crop_size(),
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            repetitions: default_repetitions(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/classifier.onnx")
}

fn default_image_path() -> PathBuf {
    PathBuf::from("./images/sample.jpg")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target_size() -> Size {
    Size::square(256)
}

fn default_crop_size() -> Size {
    Size::square(224)
}

fn default_top_k() -> usize {
    5
}

fn default_repetitions() -> usize {
    10
}

/// Loads configuration by merging files and environment variables.
///
/// Sources (lowest to highest precedence):
/// 1. `config/default.toml`
/// 2. `config/{environment}.toml` (if `environment` is Some)
/// 3. `config/local.toml` (optional, ignored in git)
/// 4. Environment variables prefixed with `LUMEN__`
pub fn load_config(env: Option<&str>) -> Result<AppConfig> {
    load_config_from(Path::new("config"), env)
}

/// Same as [`load_config`], reading the files from `base_path`.
pub fn load_config_from(base_path: &Path, env: Option<&str>) -> Result<AppConfig> {
    let mut builder =
        Config::builder().add_source(File::from(base_path.join("default.toml")).required(true));

    if let Some(env_name) = env.filter(|name| *name != "default") {
        builder = builder
            .add_source(File::from(base_path.join(format!("{env_name}.toml"))).required(false));
    }

    builder = builder.add_source(File::from(base_path.join("local.toml")).required(false));

    builder = builder.add_source(
        Environment::with_prefix("LUMEN")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .ignore_empty(true),
    );

    let config = builder.build()?;
    config
        .try_deserialize()
        .map_err(|err: ConfigError| err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_default_file_yields_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "").unwrap();
        let config = load_config_from(dir.path(), None).unwrap();
        assert_eq!(config.preprocess.target_size, Size::square(256));
        assert_eq!(config.preprocess.crop_size, Size::square(224));
        assert_eq!(config.preprocess.resize_filter, ResizeFilter::Bicubic);
        assert_eq!(config.inference.top_k, 5);
        assert_eq!(config.inference.repetitions, 10);
        assert_eq!(config.log_level, "info");
        assert!(config.labels_path.is_none());
    }

    #[test]
    fn environment_file_overrides_default() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "model_path = \"a.onnx\"\n[inference]\ntop_k = 3\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("bench.toml"),
            "[inference]\nrepetitions = 50\n[preprocess]\ntarget_size = [320, 320]\nresize_filter = \"bilinear\"\n",
        )
        .unwrap();

        let config = load_config_from(dir.path(), Some("bench")).unwrap();
        assert_eq!(config.model_path, PathBuf::from("a.onnx"));
        assert_eq!(config.inference.top_k, 3);
        assert_eq!(config.inference.repetitions, 50);
        assert_eq!(config.preprocess.target_size, Size::new(320, 320));
        assert_eq!(config.preprocess.resize_filter, ResizeFilter::Bilinear);
    }

    #[test]
    fn missing_environment_file_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "log_level = \"debug\"").unwrap();
        fs::write(dir.path().join("local.toml"), "labels_path = \"labels.txt\"").unwrap();
        let config = load_config_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.labels_path, Some(PathBuf::from("labels.txt")));
    }

    #[test]
    fn default_file_is_required() {
        let dir = tempdir().unwrap();
        assert!(load_config_from(dir.path(), None).is_err());
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[preprocess]\nresize_filter = \"sinc\"\n",
        )
        .unwrap();
        assert!(load_config_from(dir.path(), None).is_err());
    }
}
