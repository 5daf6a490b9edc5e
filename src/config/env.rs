use crate::config::{ServiceConfig, StoreBackend, DRIVER_URI_HINT};
use crate::utils::error::{LookupError, Result};
use std::env;

impl ServiceConfig {
    /// 從環境變數載入配置 (部署平台主要使用這個方式)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = ServiceConfig::default();

        if let Some(bind) = var("BIND_ADDRESS") {
            config.server.bind_address = bind;
        } else if let Some(port) = var("PORT") {
            // 託管平台只給 PORT
            let port: u16 = port.parse().map_err(|_| LookupError::InvalidConfigValueError {
                field: "PORT".to_string(),
                value: port.clone(),
                reason: "PORT must be a number between 0 and 65535".to_string(),
            })?;
            config.server.bind_address = format!("0.0.0.0:{}", port);
        }

        if let Some(backend) = var("STORE_BACKEND") {
            config.store.backend = backend.parse()?;
        }
        config.store.uri = var("STORE_URI");
        if config.store.uri.is_none()
            && config.store.backend == StoreBackend::DataApi
            && var("MONGO_URI").is_some()
        {
            return Err(LookupError::ConfigValidationError {
                field: "MONGO_URI".to_string(),
                message: DRIVER_URI_HINT.to_string(),
            });
        }
        config.store.api_key = var("STORE_API_KEY");
        config.store.ca_file = var("STORE_CA_FILE");
        config.store.fixture_path = var("STORE_FIXTURE");

        if let Some(data_source) = var("STORE_DATA_SOURCE") {
            config.store.data_source = data_source;
        }
        if let Some(database) = var("STORE_DATABASE") {
            config.store.database = database;
        }
        if let Some(collection) = var("STORE_COLLECTION") {
            config.store.collection = collection;
        }
        if let Some(timeout) = var("STORE_TIMEOUT_SECONDS") {
            config.store.timeout_seconds =
                timeout
                    .parse()
                    .map_err(|_| LookupError::InvalidConfigValueError {
                        field: "STORE_TIMEOUT_SECONDS".to_string(),
                        value: timeout.clone(),
                        reason: "Value must be a whole number of seconds".to_string(),
                    })?;
        }

        if let Some(shape) = var("EXACT_MATCH_SHAPE") {
            config.response.exact_match_shape = shape.parse()?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            config.logging.format = format.parse()?;
        }

        Ok(config)
    }
}
