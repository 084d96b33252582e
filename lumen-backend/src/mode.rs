//! Backend modes and the validated request that picks an execution target.

use std::fmt;
use std::str::FromStr;

use lumen_core::{LumenError, LumenResult};
use serde::{Deserialize, Serialize};

/// Device id meaning "the default, on-board execution target".
pub const DEFAULT_DEVICE: i32 = -1;

/// How the session chooses where to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Let the engine bind a device, using the device id as a hint.
    #[default]
    Auto,
    /// The single implicit on-board target; the device id is ignored.
    #[serde(alias = "ax")]
    Onboard,
    /// An explicitly numbered discrete accelerator.
    #[serde(alias = "axcl")]
    Discrete,
}

impl BackendMode {
    pub const ALL: [BackendMode; 3] = [Self::Auto, Self::Onboard, Self::Discrete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Onboard => "onboard",
            Self::Discrete => "discrete",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendMode {
    type Err = LumenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "onboard" | "ax" => Ok(Self::Onboard),
            "discrete" | "axcl" => Ok(Self::Discrete),
            other => Err(LumenError::invalid_backend(format!(
                "unknown backend '{other}', expected one of auto, onboard, discrete"
            ))),
        }
    }
}

/// Where a session runs, resolved from a mode and device id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExecutionTarget {
    /// `hint` is `None` for the default target, otherwise a device number.
    Auto { hint: Option<i32> },
    Onboard,
    /// `device_id` is always non-negative.
    Discrete { device_id: i32 },
}

impl fmt::Display for ExecutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto { hint: None } => f.write_str("auto(default)"),
            Self::Auto { hint: Some(id) } => write!(f, "auto(device {id})"),
            Self::Onboard => f.write_str("onboard"),
            Self::Discrete { device_id } => write!(f, "discrete(device {device_id})"),
        }
    }
}

/// A mode and device id that have passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendRequest {
    mode: BackendMode,
    device_id: i32,
}

impl BackendRequest {
    /// Fails with `InvalidBackendConfiguration` when `device_id < -1`, or
    /// when `Discrete` is asked for without a concrete device.
    pub fn new(mode: BackendMode, device_id: i32) -> LumenResult<Self> {
        if device_id < DEFAULT_DEVICE {
            return Err(LumenError::invalid_backend(format!(
                "device_id must be >= -1, got {device_id}"
            )));
        }
        if mode == BackendMode::Discrete && device_id < 0 {
            return Err(LumenError::invalid_backend(format!(
                "backend 'discrete' requires device_id >= 0, got {device_id}"
            )));
        }
        Ok(Self { mode, device_id })
    }

    /// Parse the mode name and validate both values.
    pub fn parse(mode: &str, device_id: i32) -> LumenResult<Self> {
        Self::new(mode.parse()?, device_id)
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    pub fn target(&self) -> ExecutionTarget {
        match self.mode {
            BackendMode::Auto if self.device_id == DEFAULT_DEVICE => {
                ExecutionTarget::Auto { hint: None }
            }
            BackendMode::Auto => ExecutionTarget::Auto {
                hint: Some(self.device_id),
            },
            BackendMode::Onboard => ExecutionTarget::Onboard,
            BackendMode::Discrete => ExecutionTarget::Discrete {
                device_id: self.device_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes_and_legacy_names() {
        assert_eq!("auto".parse::<BackendMode>().unwrap(), BackendMode::Auto);
        assert_eq!("ONBOARD".parse::<BackendMode>().unwrap(), BackendMode::Onboard);
        assert_eq!("ax".parse::<BackendMode>().unwrap(), BackendMode::Onboard);
        assert_eq!("axcl".parse::<BackendMode>().unwrap(), BackendMode::Discrete);
    }

    #[test]
    fn unknown_mode_is_a_configuration_error() {
        assert!(matches!(
            BackendRequest::parse("bogus", 0),
            Err(LumenError::InvalidBackendConfiguration(_))
        ));
    }

    #[test]
    fn discrete_requires_a_concrete_device() {
        assert!(matches!(
            BackendRequest::new(BackendMode::Discrete, -1),
            Err(LumenError::InvalidBackendConfiguration(_))
        ));
        let request = BackendRequest::new(BackendMode::Discrete, 2).unwrap();
        assert_eq!(request.target(), ExecutionTarget::Discrete { device_id: 2 });
    }

    #[test]
    fn device_below_default_is_rejected_for_every_mode() {
        for mode in BackendMode::ALL {
            assert!(matches!(
                BackendRequest::new(mode, -2),
                Err(LumenError::InvalidBackendConfiguration(_))
            ));
        }
    }

    #[test]
    fn auto_uses_the_device_as_a_hint() {
        let default = BackendRequest::new(BackendMode::Auto, -1).unwrap();
        assert_eq!(default.target(), ExecutionTarget::Auto { hint: None });
        let hinted = BackendRequest::new(BackendMode::Auto, 0).unwrap();
        assert_eq!(hinted.target(), ExecutionTarget::Auto { hint: Some(0) });
    }

    #[test]
    fn onboard_ignores_the_device() {
        for device_id in [-1, 0, 3] {
            let request = BackendRequest::new(BackendMode::Onboard, device_id).unwrap();
            assert_eq!(request.target(), ExecutionTarget::Onboard);
        }
    }

    #[test]
    fn modes_deserialize_with_aliases() {
        let mode: BackendMode = serde_json::from_str("\"axcl\"").unwrap();
        assert_eq!(mode, BackendMode::Discrete);
        assert_eq!(
            serde_json::to_string(&ExecutionTarget::Discrete { device_id: 1 }).unwrap(),
            r#"{"kind":"discrete","device_id":1}"#
        );
    }
}
