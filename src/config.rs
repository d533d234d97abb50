//! Configuration loading for the gradebook.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.gradebook/config.toml`)
//! 3. User config (`~/.gradebook/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Grade;
use crate::error::{GradebookError, Result};

/// Valid values for the output format field.
pub const VALID_FORMATS: &[&str] = &["text", "json"];

/// Largest accepted number of decimal places.
pub const MAX_PRECISION: usize = 6;

/// Main configuration struct for the gradebook.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Report output configuration.
    pub output: OutputConfig,
    /// Demo data configuration.
    pub demo: DemoConfig,
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Decimal places for averages (0 to `MAX_PRECISION`).
    pub precision: usize,
    /// Default output format: "text" or "json".
    pub format: String,
}

impl OutputConfig {
    /// Check if a precision value is valid.
    pub fn is_valid_precision(value: usize) -> bool {
        value <= MAX_PRECISION
    }

    /// Check if a format value is valid.
    pub fn is_valid_format(value: &str) -> bool {
        VALID_FORMATS.contains(&value)
    }

    /// Whether JSON is the default output format.
    pub fn json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            format: "text".to_string(),
        }
    }
}

/// Demo data configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Grades recorded by `gradebook demo`. Validated on load.
    pub grades: Vec<Grade>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let grades = [
            ("Mathematik I", 1.7, 6),
            ("Programmierung I", 1.3, 8),
            ("Datenbanken", 2.0, 5),
            ("Web-Anwendungen", 1.0, 6),
        ]
        .into_iter()
        .filter_map(|(name, value, credits)| Grade::new(name, value, credits).ok())
        .collect();

        Self { grades }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.gradebook/config.toml` in cwd)
    /// 3. User config (`~/.gradebook/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.gradebook/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = gradebook_home()?;
        Self::load_optional(&home.join("config.toml"))
    }

    /// Load project config from `.gradebook/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_optional(&project_config_path(cwd))
    }

    /// Load a config file that may legitimately be absent.
    ///
    /// A file that exists but does not parse is ignored with a warning.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| GradebookError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| GradebookError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // GRADEBOOK_PRECISION
        if let Ok(val) = env::var("GRADEBOOK_PRECISION") {
            match val.parse::<usize>() {
                Ok(n) if OutputConfig::is_valid_precision(n) => self.output.precision = n,
                _ => eprintln!(
                    "Warning: Invalid GRADEBOOK_PRECISION value '{}'. \
                    Expected an integer from 0 to {}. Using '{}'.",
                    val, MAX_PRECISION, self.output.precision
                ),
            }
        }

        // GRADEBOOK_FORMAT
        if let Ok(val) = env::var("GRADEBOOK_FORMAT") {
            if OutputConfig::is_valid_format(&val) {
                self.output.format = val;
            } else {
                eprintln!(
                    "Warning: Invalid GRADEBOOK_FORMAT value '{}'. \
                    Valid values: {:?}. Using '{}'.",
                    val, VALID_FORMATS, self.output.format
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Values in `other` that differ from the defaults take precedence.
    /// A higher layer cannot reset a value back to its default, since a
    /// default value is indistinguishable from an unset one.
    fn merge(mut self, other: Config) -> Self {
        let default_output = OutputConfig::default();
        if other.output.precision != default_output.precision
            && OutputConfig::is_valid_precision(other.output.precision)
        {
            self.output.precision = other.output.precision;
        }
        if other.output.format != default_output.format
            && OutputConfig::is_valid_format(&other.output.format)
        {
            self.output.format = other.output.format;
        }

        if other.demo != DemoConfig::default() {
            self.demo = other.demo;
        }

        self
    }

    /// Save configuration to the project config file.
    ///
    /// Writes to `.gradebook/config.toml` in the given directory, creating
    /// the directory if needed. The write goes through a temp file and a
    /// rename.
    pub fn save_project(&self, cwd: &Path) -> Result<PathBuf> {
        let dir = project_dir(cwd);

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| GradebookError::storage(&dir, e))?;
        }

        let config_path = project_config_path(cwd);

        let content =
            toml::to_string_pretty(self).map_err(|e| GradebookError::config(e.to_string()))?;

        let temp_path = dir.join(".config.toml.tmp");
        fs::write(&temp_path, &content).map_err(|e| GradebookError::storage(&temp_path, e))?;

        let file = fs::File::open(&temp_path).map_err(|e| GradebookError::storage(&temp_path, e))?;
        file.sync_all()
            .map_err(|e| GradebookError::storage(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &config_path)
            .map_err(|e| GradebookError::storage(&config_path, e))?;

        Ok(config_path)
    }
}

/// Get the gradebook home directory.
///
/// Uses `$GRADEBOOK_HOME` when set to a non-empty value, otherwise
/// `~/.gradebook`. Returns `None` when no home directory is known.
pub fn gradebook_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("GRADEBOOK_HOME") {
        if home.is_empty() {
            tracing::warn!("GRADEBOOK_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".gradebook"))
}

/// Get the project `.gradebook` directory for a working directory.
pub fn project_dir(cwd: &Path) -> PathBuf {
    cwd.join(".gradebook")
}

/// Get the project config file path for a working directory.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    project_dir(cwd).join("config.toml")
}
