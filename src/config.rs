use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::agent::DEFAULT_CONFIDENCE_THRESHOLD;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct MailmindConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub gmail: GmailConfig,
}

/// Local model runtime
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    /// Path to the `ollama` binary
    #[serde(default = "default_runtime_path")]
    pub runtime_path: PathBuf,

    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout in seconds for one model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Responses below this confidence are marked as low confidence
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_runtime_path() -> PathBuf {
    PathBuf::from("ollama")
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            runtime_path: default_runtime_path(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

/// Cache documents for model responses and email summaries
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_llm_file")]
    pub llm_file: String,

    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_directory() -> PathBuf {
    PathBuf::from("cache")
}

fn default_llm_file() -> String {
    "llm_cache.json".to_string()
}

fn default_summary_file() -> String {
    "email_summary_cache.json".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            directory: default_cache_directory(),
            llm_file: default_llm_file(),
            summary_file: default_summary_file(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file() -> String {
    "llm_log.md".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file: default_log_file(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GmailConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OAuth access token; usually supplied through `GMAIL_ACCESS_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_unread_query")]
    pub unread_query: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Where `summarize --send` delivers the digest
    #[serde(default = "default_summary_recipient")]
    pub summary_recipient: String,
}

fn default_api_base_url() -> String {
    mailmind_gmail::DEFAULT_BASE_URL.to_string()
}

fn default_unread_query() -> String {
    "is:unread".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_summary_recipient() -> String {
    "me".to_string()
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            unread_query: default_unread_query(),
            max_results: default_max_results(),
            summary_recipient: default_summary_recipient(),
        }
    }
}

/// Overlay `overlay` onto `base`: tables merge key by key, any other value
/// replaces what `base` held.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                } else {
                    base.insert(key, toml::Value::Table(incoming));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

impl MailmindConfig {
    pub fn llm_cache_path(&self) -> PathBuf {
        self.cache.directory.join(&self.cache.llm_file)
    }

    pub fn summary_cache_path(&self) -> PathBuf {
        self.cache.directory.join(&self.cache.summary_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log.directory.join(&self.log.file)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid range in {field}: {value} (valid range: {valid_range})")]
    InvalidRange {
        field: String,
        value: String,
        valid_range: String,
    },

    #[error("Missing value for {field}")]
    MissingValue { field: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MailmindConfig {
    pub fn generate_default_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_else(|_| {
            r#"# Mailmind Configuration File
[model]
model = "llama3"
"#
            .to_string()
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_layers(vec![Self::load_layer(path)?])
    }

    /// Read a config file as a raw table, keeping only the keys it sets
    pub fn load_layer<P: AsRef<Path>>(path: P) -> Result<toml::Table, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(content.parse::<toml::Table>()?)
    }

    /// Build a config from file layers, lowest priority first.
    ///
    /// A key set in a later layer always wins, even when it restates the
    /// built-in default.
    pub fn from_layers(layers: Vec<toml::Table>) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();
        for layer in layers {
            merge_tables(&mut merged, layer);
        }
        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// Get the user config file path (~/.config/mailmind/config.toml)
    pub fn get_user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/mailmind/config.toml"))
    }

    /// Get the current directory config file path (./mailmind.toml)
    pub fn get_current_config_path() -> PathBuf {
        PathBuf::from("./mailmind.toml")
    }

    /// Load and merge configs from all files with priority:
    /// 1. User config (~/.config/mailmind/config.toml) - lowest priority (base)
    /// 2. Current directory (./mailmind.toml)
    /// 3. Explicit `--config` file - highest file priority
    pub fn load_with_merged_configs(explicit: Option<&Path>) -> Result<Self> {
        let mut layers = Vec::new();

        let discovered = Self::get_user_config_path()
            .into_iter()
            .chain(std::iter::once(Self::get_current_config_path()));
        for path in discovered.filter(|path| path.exists()) {
            layers.push(
                Self::load_layer(&path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?,
            );
            tracing::debug!("Loaded config from: {}", path.display());
        }

        if let Some(path) = explicit {
            layers.push(
                Self::load_layer(path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?,
            );
        }

        Ok(Self::from_layers(layers)?)
    }

    pub fn apply_env_vars(&mut self, env_vars: &HashMap<String, String>) -> Result<()> {
        if let Some(token) = env_vars.get("GMAIL_ACCESS_TOKEN") {
            self.gmail.access_token = Some(token.clone());
        }

        for (key, value) in env_vars {
            if let Some(config_key) = key.strip_prefix("MAILMIND_") {
                match config_key {
                    "MODEL_RUNTIME_PATH" => self.model.runtime_path = PathBuf::from(value),
                    "MODEL_MODEL" => self.model.model = value.clone(),
                    "MODEL_TIMEOUT_SECS" => {
                        self.model.timeout_secs = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid timeout_secs value: {}", value))?;
                    }
                    "MODEL_CONFIDENCE_THRESHOLD" => {
                        self.model.confidence_threshold = value.parse().map_err(|_| {
                            anyhow!("Invalid confidence_threshold value: {}", value)
                        })?;
                    }
                    "CACHE_ENABLED" => {
                        self.cache.enabled = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid cache enabled value: {}", value))?;
                    }
                    "CACHE_DIRECTORY" => self.cache.directory = PathBuf::from(value),
                    "LOG_DIRECTORY" => self.log.directory = PathBuf::from(value),
                    "GMAIL_API_BASE_URL" => self.gmail.api_base_url = value.clone(),
                    "GMAIL_ACCESS_TOKEN" => self.gmail.access_token = Some(value.clone()),
                    "GMAIL_UNREAD_QUERY" => self.gmail.unread_query = value.clone(),
                    "GMAIL_MAX_RESULTS" => {
                        self.gmail.max_results = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid max_results value: {}", value))?;
                    }
                    "GMAIL_SUMMARY_RECIPIENT" => self.gmail.summary_recipient = value.clone(),
                    _ => {} // Ignore unknown environment variables
                }
            }
        }
        Ok(())
    }

    /// Apply command-line overrides (highest priority)
    pub fn apply_cli_overrides(&mut self, model: Option<&str>, no_cache: bool) {
        if let Some(model) = model {
            self.model.model = model.to_string();
        }
        if no_cache {
            self.cache.enabled = false;
        }
    }

    /// Load configuration with full precedence chain:
    /// 1. Default values (lowest)
    /// 2. User config (~/.config/mailmind/config.toml)
    /// 3. Current directory (./mailmind.toml)
    /// 4. Explicit `--config` file
    /// 5. Environment variables (MAILMIND_*, GMAIL_ACCESS_TOKEN)
    ///
    /// CLI flags are applied by the caller afterwards.
    pub fn load_with_precedence(
        config_path: Option<&Path>,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::load_with_merged_configs(config_path)?;
        config.apply_env_vars(env_vars)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.model.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidRange {
                field: "model.confidence_threshold".to_string(),
                value: threshold.to_string(),
                valid_range: "0.0-1.0".to_string(),
            });
        }

        if self.model.timeout_secs == 0 || self.model.timeout_secs > 3600 {
            return Err(ConfigError::InvalidRange {
                field: "model.timeout_secs".to_string(),
                value: self.model.timeout_secs.to_string(),
                valid_range: "1-3600".to_string(),
            });
        }

        if self.model.model.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                field: "model.model".to_string(),
            });
        }

        if !(1..=500).contains(&self.gmail.max_results) {
            return Err(ConfigError::InvalidRange {
                field: "gmail.max_results".to_string(),
                value: self.gmail.max_results.to_string(),
                valid_range: "1-500".to_string(),
            });
        }

        Ok(())
    }
}
