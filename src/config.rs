use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docpipe server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the remote OCR job API.
    pub ocr_api_url: String,
    /// Optional API key required by the OCR API.
    pub ocr_api_key: Option<String>,
    /// Base URL of the remote translation API.
    pub translation_api_url: String,
    /// Optional API key required by the translation API.
    pub translation_api_key: Option<String>,
    /// Optional base URL of the transient blob store; cleanup is skipped when unset.
    pub blob_store_url: Option<String>,
    /// Optional API key required by the blob store.
    pub blob_store_api_key: Option<String>,
    /// Per-page OCR rate in dollars; pricing tiers vary, so this is configuration.
    pub ocr_cost_per_page: Option<f64>,
    /// Translation rate in dollars per 1000 source characters.
    pub translation_cost_per_1000_chars: Option<f64>,
    /// Optional override for the translation chunk budget (characters).
    pub translation_chunk_size: Option<usize>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            ocr_api_url: load_env("OCR_API_URL")?,
            ocr_api_key: load_env_optional("OCR_API_KEY"),
            translation_api_url: load_env("TRANSLATION_API_URL")?,
            translation_api_key: load_env_optional("TRANSLATION_API_KEY"),
            blob_store_url: load_env_optional("BLOB_STORE_URL"),
            blob_store_api_key: load_env_optional("BLOB_STORE_API_KEY"),
            ocr_cost_per_page: parse_optional("OCR_COST_PER_PAGE")?,
            translation_cost_per_1000_chars: parse_optional("TRANSLATION_COST_PER_1000_CHARS")?,
            translation_chunk_size: parse_optional("TRANSLATION_CHUNK_SIZE")?,
            server_port: parse_optional("SERVER_PORT")?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        ocr_api_url = %config.ocr_api_url,
        translation_api_url = %config.translation_api_url,
        blob_store = config.blob_store_url.is_some(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
