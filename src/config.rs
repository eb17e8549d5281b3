use planner_core::ai::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use planner_core::storage::DEFAULT_WATCH_INTERVAL;
use planner_core::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Generative-AI service settings
#[derive(Debug, Clone, Serialize)]
pub struct AiConfig {
    /// API key; AI commands fall back to canned answers without one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: ConfigValue<String>,
    pub model: ConfigValue<String>,
    pub image_model: ConfigValue<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: ConfigValue::new(DEFAULT_BASE_URL.to_string(), ConfigSource::Default),
            model: ConfigValue::new(DEFAULT_TEXT_MODEL.to_string(), ConfigSource::Default),
            image_model: ConfigValue::new(DEFAULT_IMAGE_MODEL.to_string(), ConfigSource::Default),
        }
    }
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone().unwrap_or_default(),
            base_url: self.base_url.value.clone(),
            text_model: self.model.value.clone(),
            image_model: self.image_model.value.clone(),
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the shared planner state
    pub data_dir: ConfigValue<PathBuf>,
    /// How often `watch` polls for changes, in milliseconds
    pub watch_interval_ms: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub ai: AiConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    watch_interval_ms: Option<u64>,
    ai: Option<AiFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AiFile {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    image_model: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut watch_interval_ms = ConfigValue::new(
            DEFAULT_WATCH_INTERVAL.as_millis() as u64,
            ConfigSource::Default,
        );
        let mut config_file = None;
        let mut ai = AiConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Relative paths are resolved against the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir.set(resolved, ConfigSource::File);
            }
            if let Some(ms) = file_config.watch_interval_ms {
                watch_interval_ms.set(ms, ConfigSource::File);
            }
            if let Some(file_ai) = file_config.ai {
                ai.api_key = file_ai.api_key;
                if let Some(url) = file_ai.base_url {
                    ai.base_url.set(url, ConfigSource::File);
                }
                if let Some(model) = file_ai.model {
                    ai.model.set(model, ConfigSource::File);
                }
                if let Some(model) = file_ai.image_model {
                    ai.image_model.set(model, ConfigSource::File);
                }
            }
        }

        if let Ok(dir) = std::env::var("PLANNER_DATA_DIR") {
            data_dir.set(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("PLANNER_AI_API_KEY") {
            ai.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("PLANNER_AI_BASE_URL") {
            ai.base_url.set(url, ConfigSource::Environment);
        }
        if let Ok(model) = std::env::var("PLANNER_AI_MODEL") {
            ai.model.set(model, ConfigSource::Environment);
        }
        if let Ok(model) = std::env::var("PLANNER_AI_IMAGE_MODEL") {
            ai.image_model.set(model, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            watch_interval_ms,
            config_file,
            ai,
        })
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.value.max(1))
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/meal-planner/
    /// - macOS: ~/Library/Application Support/meal-planner/
    /// - Windows: %APPDATA%/meal-planner/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meal-planner")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/meal-planner/
    /// - macOS: ~/Library/Application Support/meal-planner/
    /// - Windows: %APPDATA%/meal-planner/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meal-planner")
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
