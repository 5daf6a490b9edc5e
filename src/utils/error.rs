use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    QueryParameterError { message: String },

    #[error("Store request failed: {message}")]
    StoreError { message: String },

    #[error("Malformed reference data: {message}")]
    InvalidData { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Lookup,
    Store,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LookupError {
    pub fn invalid_input() -> Self {
        LookupError::InvalidInput {
            message: "Invalid search term.".to_string(),
        }
    }

    pub fn not_found() -> Self {
        LookupError::NotFound {
            message: "No matching data found.".to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::InvalidInput { .. } | LookupError::QueryParameterError { .. } => {
                ErrorCategory::Input
            }
            LookupError::NotFound { .. } => ErrorCategory::Lookup,
            LookupError::StoreError { .. }
            | LookupError::InvalidData { .. }
            | LookupError::ApiError(_)
            | LookupError::SerializationError(_) => ErrorCategory::Store,
            LookupError::ConfigError { .. }
            | LookupError::MissingConfigError { .. }
            | LookupError::InvalidConfigValueError { .. }
            | LookupError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            LookupError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Store => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於內部錯誤 (對外只回報訊息字串)
    pub fn is_internal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Store | ErrorCategory::Configuration | ErrorCategory::System
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LookupError::InvalidInput { .. } => {
                "Use only letters, digits and spaces in the search term"
            }
            LookupError::QueryParameterError { .. } => {
                "Pass a 'query' parameter with at least 2 characters"
            }
            LookupError::NotFound { .. } => "Try an organ name, a pattern name or a shorter symptom",
            LookupError::StoreError { .. } | LookupError::ApiError(_) => {
                "Check that the document store is reachable and the API key is valid"
            }
            LookupError::InvalidData { .. } | LookupError::SerializationError(_) => {
                "Check that the stored documents have 'organ' and 'patterns' fields"
            }
            LookupError::IoError(_) => "Check file paths and permissions",
            LookupError::ConfigError { .. }
            | LookupError::MissingConfigError { .. }
            | LookupError::InvalidConfigValueError { .. }
            | LookupError::ConfigValidationError { .. } => {
                "Review the configuration file and STORE_* environment variables"
            }
        }
    }

    /// 對外顯示的錯誤訊息，內部錯誤統一加上前綴
    pub fn user_friendly_message(&self) -> String {
        if self.is_internal() {
            format!("Internal server error: {}", self)
        } else {
            self.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
