//! Application configuration module.
//!
//! Configuration is loaded from a JSON file once at startup and shared as a
//! process-wide instance.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::ConfigError;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/app_config.json";

/// Global configuration instance
static CONFIG_INSTANCE: OnceCell<AppConfig> = OnceCell::new();

/// Application configuration structure.
///
/// String fields use `Box<str>` for memory efficiency since they are set
/// once and never modified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum allowed upload size in bytes
    pub max_file_size: u64,

    /// Host URL for the server
    pub host_url: Box<str>,

    /// Number of pipeline workers pulling queued jobs
    pub worker_count: usize,

    /// Maximum duration of one job before it is forcibly failed
    pub job_timeout_minutes: u64,

    /// Default source language tag for new jobs
    pub source_language: Box<str>,

    /// Default target language tag for new jobs
    pub target_language: Box<str>,

    /// Recognition engine command (e.g. "tesseract")
    pub ocr_engine: Box<str>,

    /// Language pack passed to the recognition engine (e.g. "ara")
    pub ocr_language: Box<str>,

    /// Translation model endpoint URL; absent means blocks pass through
    /// untranslated (development mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_endpoint: Option<Box<str>>,

    /// Translation model identifier sent to the endpoint
    pub translation_model: Box<str>,

    /// Number of blocks per translation model call
    pub translation_batch_size: usize,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration JSON file
    ///
    /// # Returns
    ///
    /// Returns the parsed `AppConfig` or a `ConfigError` if loading fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Initialize the global configuration instance.
    ///
    /// This should be called once at application startup. If not called,
    /// `get()` will initialize with default values.
    pub fn init() -> Result<&'static Self, ConfigError> {
        CONFIG_INSTANCE.get_or_try_init(Self::load_default)
    }

    /// Initialize the global configuration instance from an explicit file.
    pub fn init_from<P: AsRef<Path>>(path: P) -> Result<&'static Self, ConfigError> {
        CONFIG_INSTANCE.get_or_try_init(|| Self::from_file(path))
    }

    /// Get the global configuration instance.
    ///
    /// If the configuration hasn't been initialized, returns default values.
    #[must_use]
    pub fn get() -> &'static Self {
        CONFIG_INSTANCE.get_or_init(Self::default)
    }

    /// Create a new configuration with default values.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024, // 50 MB
            host_url: "0.0.0.0:8000".into(),
            worker_count: 2,
            job_timeout_minutes: 30,
            source_language: "ar".into(),
            target_language: "en".into(),
            ocr_engine: "tesseract".into(),
            ocr_language: "ara".into(),
            translation_endpoint: None,
            translation_model: "nllb-200-3.3B".into(),
            translation_batch_size: 32,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
