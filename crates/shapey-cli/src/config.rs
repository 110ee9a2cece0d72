//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments, which always win

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapey_core::spec::{SHAPEY_DEBUG, SHAPEY_MODE, SHAPEY_TRANSFORMS};
use shapey_core::{ErrorPolicy, Mode, Spec, TransformsMode};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Control settings applied to specs that do not set their own
    pub defaults: ShapeDefaults,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format, used when `--output` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Use colored output when the terminal supports it
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<LogFormat>,
}

/// Default control settings for loaded specs
///
/// Mode and transforms strings are matched the same way `shapeyMode` and
/// `shapeyTransforms` are, so `"Super Strict"` and `"super-strict"` both work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transforms: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugPolicy>,
}

/// Transform failure handling selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugPolicy {
    /// Failed fields become null
    Silent,
    /// Failed fields become null and are logged
    Log,
    /// Failed fields keep their input value
    Skip,
}

impl DebugPolicy {
    pub fn to_error_policy(self) -> ErrorPolicy {
        match self {
            DebugPolicy::Silent => ErrorPolicy::Silent,
            DebugPolicy::Log => ErrorPolicy::log(),
            DebugPolicy::Skip => ErrorPolicy::Skip,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl ShapeDefaults {
    /// The configured mode, if any
    pub fn mode(&self) -> Result<Option<Mode>> {
        self.mode
            .as_deref()
            .map(|raw| {
                Mode::recognize(raw)
                    .ok_or_else(|| Error::config(format!("Unrecognized default mode '{}'", raw)))
            })
            .transpose()
    }

    /// The configured transforms mode, if any
    pub fn transforms(&self) -> Result<Option<TransformsMode>> {
        self.transforms
            .as_deref()
            .map(|raw| {
                TransformsMode::recognize(raw).ok_or_else(|| {
                    Error::config(format!("Unrecognized default transforms mode '{}'", raw))
                })
            })
            .transpose()
    }

    /// Fill in the control settings `document` does not declare itself
    pub fn apply(&self, spec: &mut Spec, document: &Value) -> Result<()> {
        if let Some(mode) = self.mode()? {
            if !declares(document, SHAPEY_MODE) {
                spec.set_mode(mode);
            }
        }
        if let Some(transforms) = self.transforms()? {
            if !declares(document, SHAPEY_TRANSFORMS) {
                spec.set_transforms_mode(transforms);
            }
        }
        if let Some(debug) = self.debug {
            if !declares(document, SHAPEY_DEBUG) {
                spec.set_error_policy(debug.to_error_policy());
            }
        }
        Ok(())
    }
}

/// Whether a spec document sets the control key itself
fn declares(document: &Value, control_key: &str) -> bool {
    document
        .as_object()
        .map(|map| map.keys().any(|key| key.eq_ignore_ascii_case(control_key)))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".shapey.yaml"),
            PathBuf::from(".shapey.json"),
            PathBuf::from("shapey.yaml"),
            PathBuf::from("shapey.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let shapey_dir = config_dir.join("shapey");
            paths.push(shapey_dir.join("config.yaml"));
            paths.push(shapey_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".shapey.yaml"));
            paths.push(home_dir.join(".shapey.json"));
        }

        paths
    }

    /// Reject settings that would only fail later, mid-command
    pub fn validate(&self) -> Result<()> {
        self.defaults.mode()?;
        self.defaults.transforms()?;
        Ok(())
    }

    /// A starter configuration with every setting spelled out
    pub fn template() -> Self {
        ConfigBuilder::new()
            .output_format(OutputFormat::Human)
            .log_level("warn")
            .default_mode(Mode::Loose)
            .default_transforms(TransformsMode::Default)
            .default_debug(DebugPolicy::Silent)
            .build()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Builder for creating configurations programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = Some(format);
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = Some(level.into());
        self
    }

    pub fn default_mode(mut self, mode: Mode) -> Self {
        self.config.defaults.mode = Some(mode.to_string());
        self
    }

    pub fn default_transforms(mut self, transforms: TransformsMode) -> Self {
        self.config.defaults.transforms = Some(transforms.to_string());
        self
    }

    pub fn default_debug(mut self, debug: DebugPolicy) -> Self {
        self.config.defaults.debug = Some(debug);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        Config::template().save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.output.format, Some(OutputFormat::Human));
        assert_eq!(loaded.defaults.mode().unwrap(), Some(Mode::Loose));
        assert_eq!(loaded.defaults.transforms().unwrap(), Some(TransformsMode::Default));
        assert_eq!(loaded.defaults.debug, Some(DebugPolicy::Silent));
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shapey.json");
        std::fs::write(&path, r#"{"defaults": {"mode": "Super Strict"}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.output.color);
        assert!(config.output.format.is_none());
        assert_eq!(config.defaults.mode().unwrap(), Some(Mode::SuperStrict));
    }

    #[test]
    fn test_unrecognized_default_mode_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shapey.yaml");
        std::fs::write(&path, "defaults:\n  mode: sideways\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_with_file(Some(Path::new("/nonexistent/shapey.yaml"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_defaults_fill_only_undeclared_settings() {
        let config = ConfigBuilder::new()
            .default_mode(Mode::Strict)
            .default_transforms(TransformsMode::Whole)
            .default_debug(DebugPolicy::Skip)
            .build();
        let document = json!({"shapeyMode": "keep", "name": "fixed"});
        let mut spec = Spec::from_value(&document).unwrap();

        config.defaults.apply(&mut spec, &document).unwrap();
        assert_eq!(spec.mode(), Mode::Keep);
        assert_eq!(spec.transforms_mode(), TransformsMode::Whole);
        assert!(matches!(spec.error_policy(), ErrorPolicy::Skip));
    }

    #[test]
    fn test_default_paths_search_project_first() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".shapey.yaml"));
        assert!(paths.len() >= 4);
    }
}
