use crate::error::{Result, SketchError};
use crate::logger::{LogLevel, LoggerConfig};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HISTORY_DIR: &str = ".rsketch";

/// Credentials and endpoint for the Gemini image model.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `API_KEY` (or `GEMINI_API_KEY`), `GEMINI_IMAGE_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Self {
        let api_key = env::var("API_KEY")
            .ok()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_IMAGE_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        let base_url = env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        GeminiConfig {
            api_key,
            model,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Startup check. A missing key is fatal and must surface before any
    /// client is built.
    pub fn validate(&self) -> Result<()> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {}
            _ => {
                return Err(SketchError::Config(
                    "API_KEY environment variable is not set".into(),
                ))
            }
        }
        if self.model.trim().is_empty() {
            return Err(SketchError::Config("image model must not be empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(SketchError::Config("base url must not be empty".into()));
        }
        Ok(())
    }

    /// The api key of a validated config.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SketchError::Config("API_KEY environment variable is not set".into()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub history_dir: PathBuf,
    pub log_level: LogLevel,
    /// Also append log lines to this file.
    pub log_file: Option<String>,
    /// Emit log lines as JSON objects instead of colored text.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            log_level: LogLevel::Info,
            log_file: None,
            log_json: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let history_dir = env::var("SKETCH_HISTORY_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_DIR));
        let log_level = env::var("RSKETCH_LOG")
            .ok()
            .and_then(|level| LogLevel::parse(&level))
            .unwrap_or(LogLevel::Info);
        let log_file = env::var("RSKETCH_LOG_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty());
        let log_json = env::var("RSKETCH_LOG_JSON")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Config {
            gemini: GeminiConfig::from_env(),
            history_dir,
            log_level,
            log_file,
            log_json,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_history_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.history_dir = dir.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<String>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_log_json(mut self, enabled: bool) -> Self {
        self.log_json = enabled;
        self
    }

    /// Logger settings derived from this config.
    pub fn logger_config(&self) -> LoggerConfig {
        let config = LoggerConfig::new()
            .with_level(self.log_level)
            .with_json_output(self.log_json);
        match &self.log_file {
            Some(path) => config.with_file_output(path),
            None => config,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.gemini.validate()
    }
}
