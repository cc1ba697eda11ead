//! Application configuration
//!
//! Precedence is CLI > environment (`SCENELINE_*`) > file > defaults. The
//! inference credential is not part of this struct; it is resolved at the
//! call site and injected into each run.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::model::DispatchMode;
use crate::engine::DispatchOptions;
use crate::error::{SceneError, SceneResult};
use crate::planner::DEFAULT_CHUNK_DURATION;
use crate::utils::logging::validate_level;

/// Environment variable holding the inference API key
pub const API_KEY_ENV: &str = "SCENELINE_API_KEY";

/// Inference service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the generative API
    pub endpoint: String,
    pub model: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Typed application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chunk window length in seconds
    pub chunk_duration_secs: f64,
    pub dispatch_mode: DispatchMode,
    /// Cap on concurrent calls in parallel mode; unset means unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    pub chunk_timeout_secs: u64,
    /// Fuse scenes split by a chunk boundary after aggregation
    pub merge_boundary_scenes: bool,
    pub boundary_tolerance_secs: f64,
    /// Directory holding the JSON project store
    pub store_dir: PathBuf,
    pub log_level: String,
    pub log_json: bool,
    pub inference: InferenceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chunk_duration_secs: DEFAULT_CHUNK_DURATION,
            dispatch_mode: DispatchMode::Sequential,
            max_concurrency: None,
            chunk_timeout_secs: 300,
            merge_boundary_scenes: false,
            boundary_tolerance_secs: 0.5,
            store_dir: PathBuf::from("projects"),
            log_level: "info".to_string(),
            log_json: false,
            inference: InferenceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Apply `SCENELINE_*` overrides from the given variables
    pub fn apply_env<I>(&mut self, vars: I) -> SceneResult<usize>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            let value = value.trim().to_string();
            match key.as_str() {
                "SCENELINE_CHUNK_DURATION" => {
                    self.chunk_duration_secs = parse_value(&key, &value)?;
                }
                "SCENELINE_DISPATCH_MODE" => {
                    self.dispatch_mode = DispatchMode::parse(&value)?;
                }
                "SCENELINE_MAX_CONCURRENCY" => {
                    self.max_concurrency = Some(parse_value(&key, &value)?);
                }
                "SCENELINE_CHUNK_TIMEOUT" => {
                    self.chunk_timeout_secs = parse_value(&key, &value)?;
                }
                "SCENELINE_MERGE_BOUNDARY_SCENES" => {
                    self.merge_boundary_scenes = parse_value(&key, &value)?;
                }
                "SCENELINE_STORE_DIR" => self.store_dir = PathBuf::from(value),
                "SCENELINE_LOG_LEVEL" => self.log_level = value,
                "SCENELINE_INFERENCE_ENDPOINT" => self.inference.endpoint = value,
                "SCENELINE_INFERENCE_MODEL" => self.inference.model = value,
                _ => continue,
            }
            tracing::debug!(key = %key, "Applied environment override");
            applied += 1;
        }
        Ok(applied)
    }

    /// Validate configuration
    pub fn validate(&self) -> SceneResult<()> {
        if !self.chunk_duration_secs.is_finite() || self.chunk_duration_secs <= 0.0 {
            return Err(config_error(format!(
                "chunk_duration_secs must be positive, got {}",
                self.chunk_duration_secs
            )));
        }
        if self.max_concurrency == Some(0) {
            return Err(config_error("max_concurrency must be at least 1".to_string()));
        }
        if self.chunk_timeout_secs == 0 {
            return Err(config_error("chunk_timeout_secs must be at least 1".to_string()));
        }
        if !self.boundary_tolerance_secs.is_finite() || self.boundary_tolerance_secs < 0.0 {
            return Err(config_error(format!(
                "boundary_tolerance_secs must be non-negative, got {}",
                self.boundary_tolerance_secs
            )));
        }
        if self.inference.model.trim().is_empty() {
            return Err(config_error("inference.model cannot be empty".to_string()));
        }
        validate_level(&self.log_level)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            mode: self.dispatch_mode,
            max_concurrency: self.max_concurrency,
            chunk_timeout: Duration::from_secs(self.chunk_timeout_secs),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> SceneResult<T> {
    value
        .parse()
        .map_err(|_| config_error(format!("Invalid value for {}: {:?}", key, value)))
}

fn config_error(message: String) -> SceneError {
    SceneError::Config { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_duration_secs, 240.0);
        assert_eq!(config.dispatch_mode, DispatchMode::Sequential);
        assert!(config.max_concurrency.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        let applied = config
            .apply_env(vars(&[
                ("SCENELINE_CHUNK_DURATION", "120"),
                ("SCENELINE_DISPATCH_MODE", "parallel"),
                ("SCENELINE_MAX_CONCURRENCY", "4"),
                ("SCENELINE_STORE_DIR", "/tmp/scenes"),
                ("HOME", "/root"),
            ]))
            .unwrap();

        assert_eq!(applied, 4);
        assert_eq!(config.chunk_duration_secs, 120.0);
        assert_eq!(config.dispatch_mode, DispatchMode::Parallel);
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.store_dir, PathBuf::from("/tmp/scenes"));
    }

    #[test]
    fn test_env_override_with_bad_value() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_env(vars(&[("SCENELINE_CHUNK_TIMEOUT", "soon")]))
            .is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig {
            chunk_duration_secs: 0.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config.chunk_duration_secs = 60.0;
        config.max_concurrency = Some(0);
        assert!(config.validate().is_err());

        config.max_concurrency = None;
        config.log_level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            dispatch_mode = "parallel"

            [inference]
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch_mode, DispatchMode::Parallel);
        assert_eq!(config.inference.model, "gemini-1.5-pro");
        assert_eq!(config.inference.endpoint, InferenceConfig::default().endpoint);
        assert_eq!(config.chunk_timeout_secs, 300);
    }
}
