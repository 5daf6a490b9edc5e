use crate::utils::error::{LookupError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LookupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_socket_addr(field_name: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse::<SocketAddr>()
        .map_err(|e| LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| LookupError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LookupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Boundary precondition for request parameters, counted in characters.
pub fn validate_min_length(field_name: &str, value: &str, min_length: usize) -> Result<()> {
    if value.chars().count() < min_length {
        return Err(LookupError::QueryParameterError {
            message: format!(
                "Query parameter '{}' must be at least {} characters",
                field_name, min_length
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("store.uri", "https://data.example.com/app/v1").is_ok());
        assert!(validate_url("store.uri", "http://localhost:8080").is_ok());
        assert!(validate_url("store.uri", "").is_err());
        assert!(validate_url("store.uri", "invalid-url").is_err());
        assert!(validate_url("store.uri", "ftp://data.example.com").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind_address", "0.0.0.0:8000").is_ok());
        assert!(validate_socket_addr("server.bind_address", "localhost").is_err());
    }

    #[test]
    fn test_validate_min_length() {
        assert!(validate_min_length("query", "li", 2).is_ok());
        assert!(validate_min_length("query", "l", 2).is_err());
        assert!(validate_min_length("query", "", 2).is_err());

        let err = validate_min_length("query", "x", 2).unwrap_err();
        assert!(matches!(err, LookupError::QueryParameterError { .. }));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("store.timeout_seconds", 30u64, 1, 300).is_ok());
        assert!(validate_range("store.timeout_seconds", 0u64, 1, 300).is_err());
    }
}
