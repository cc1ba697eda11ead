// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{SceneError, SceneResult};

/// Candidate config files, first existing one wins
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["sceneline.toml", "config/sceneline.toml"];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config_file_path: PathBuf,
}

impl TomlConfigAdapter {
    /// Create adapter for an explicit config file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file_path: path.into(),
        }
    }

    /// Locate the first default config file present on disk
    pub fn discover() -> Option<Self> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.config_file_path
    }

    /// Load configuration, missing keys taking their defaults
    pub fn load(&self) -> SceneResult<AppConfig> {
        let content = std::fs::read_to_string(&self.config_file_path).map_err(|e| {
            SceneError::Config {
                message: format!(
                    "Failed to read config file {}: {}",
                    self.config_file_path.display(),
                    e
                ),
            }
        })?;

        let config: AppConfig = toml::from_str(&content)?;
        tracing::info!(path = %self.config_file_path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> SceneResult<()> {
        if let Some(parent) = self.config_file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_file_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DispatchMode;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = TomlConfigAdapter::new(dir.path().join("nested").join("sceneline.toml"));

        let config = AppConfig {
            dispatch_mode: DispatchMode::Parallel,
            max_concurrency: Some(3),
            merge_boundary_scenes: true,
            ..AppConfig::default()
        };
        adapter.save(&config).unwrap();

        assert_eq!(adapter.load().unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let adapter = TomlConfigAdapter::new("/nonexistent/sceneline.toml");
        assert!(matches!(adapter.load(), Err(SceneError::Config { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sceneline.toml");
        std::fs::write(&path, "chunk_duration_secs = [").unwrap();

        assert!(matches!(
            TomlConfigAdapter::new(path).load(),
            Err(SceneError::TomlParse(_))
        ));
    }
}
