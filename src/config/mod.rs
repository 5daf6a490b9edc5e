#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

use crate::utils::error::{LookupError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_required_field,
    validate_socket_addr, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_DATA_SOURCE: &str = "Cluster0";
pub const DEFAULT_DATABASE: &str = "accupuncture_db";
pub const DEFAULT_COLLECTION: &str = "accupuncture_data";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// The store is reached over its HTTP Data API, not the wire protocol.
pub const DRIVER_URI_HINT: &str = "MongoDB driver connection strings are not supported; \
set STORE_URI to the HTTPS base URL of a Data API endpoint, \
or STORE_BACKEND=memory with STORE_FIXTURE for a JSON export";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    DataApi,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = LookupError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "data_api" | "data-api" => Ok(StoreBackend::DataApi),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(invalid_choice("store.backend", value, "data_api, memory")),
        }
    }
}

/// How a phase-1 (exact organ) result is written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExactMatchShape {
    /// One-element array, same shape as partial results.
    #[default]
    List,
    /// The bare document.
    Object,
}

impl FromStr for ExactMatchShape {
    type Err = LookupError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(ExactMatchShape::List),
            "object" => Ok(ExactMatchShape::Object),
            _ => Err(invalid_choice("response.exact_match_shape", value, "list, object")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LookupError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(invalid_choice("logging.format", value, "compact, json")),
        }
    }
}

fn invalid_choice(field: &str, value: &str, allowed: &str) -> LookupError {
    LookupError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("Valid values: {}", allowed),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub uri: Option<String>,
    pub api_key: Option<String>,
    pub data_source: String,
    pub database: String,
    pub collection: String,
    /// PEM bundle trusted for the store's TLS connection.
    pub ca_file: Option<String>,
    /// JSON export used by the memory backend.
    pub fixture_path: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: None,
            api_key: None,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            ca_file: None,
            fixture_path: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

// api_key 不寫進日誌
impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("backend", &self.backend)
            .field("uri", &self.uri)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("data_source", &self.data_source)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("ca_file", &self.ca_file)
            .field("fixture_path", &self.fixture_path)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSettings {
    pub exact_match_shape: ExactMatchShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub response: ResponseSettings,
    pub logging: LoggingSettings,
}

impl ServiceConfig {
    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_socket_addr("server.bind_address", &self.server.bind_address)?;

        match self.store.backend {
            StoreBackend::DataApi => {
                let uri = validate_required_field("store.uri", &self.store.uri)?;
                if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
                    return Err(LookupError::ConfigValidationError {
                        field: "store.uri".to_string(),
                        message: DRIVER_URI_HINT.to_string(),
                    });
                }
                validate_url("store.uri", uri)?;
            }
            StoreBackend::Memory => {
                let path = validate_required_field("store.fixture_path", &self.store.fixture_path)?;
                validate_path("store.fixture_path", path)?;
            }
        }

        validate_non_empty_string("store.data_source", &self.store.data_source)?;
        validate_non_empty_string("store.database", &self.store.database)?;
        validate_non_empty_string("store.collection", &self.store.collection)?;
        validate_range("store.timeout_seconds", self.store.timeout_seconds, 1, 300)?;

        if let Some(ca_file) = &self.store.ca_file {
            validate_path("store.ca_file", ca_file)?;
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid_choice(
                "logging.level",
                &self.logging.level,
                &LOG_LEVELS.join(", "),
            ));
        }

        Ok(())
    }

    /// 切換為記憶體 store 並指定 fixture 檔案
    pub fn use_fixture(&mut self, path: impl Into<String>) {
        self.store.backend = StoreBackend::Memory;
        self.store.fixture_path = Some(path.into());
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
