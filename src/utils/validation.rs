use crate::utils::error::{Result, SyncError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SyncError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SyncError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SyncError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SyncError::MissingConfig {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

/// Rejects `${VAR}` placeholders that survived environment substitution.
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(SyncError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Unresolved environment variable".to_string(),
        });
    }
    Ok(())
}

/// Secrets go through here so the value never ends up in an error message.
pub fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains("${") {
        return Err(SyncError::InvalidConfigValue {
            field: field_name.to_string(),
            value: "<redacted>".to_string(),
            reason: "Unresolved environment variable".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SyncError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}
