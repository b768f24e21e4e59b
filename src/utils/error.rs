use crate::domain::model::Platform;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{platform} responded with {status}")]
    Status {
        platform: Platform,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode {platform} response: {source}")]
    Decode {
        platform: Platform,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid schedule '{expression}': {message}")]
    Schedule { expression: String, message: String },
}

impl SyncError {
    /// What gets logged when a tick fails: the remote body when there is one,
    /// otherwise the error message.
    pub fn detail(&self) -> String {
        match self {
            SyncError::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }

    /// Errors that can only come out of startup.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SyncError::Config { .. }
                | SyncError::MissingConfig { .. }
                | SyncError::InvalidConfigValue { .. }
                | SyncError::Schedule { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_prefers_response_body() {
        let err = SyncError::Status {
            platform: Platform::Destination,
            status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            body: r#"{"error":"unknown sku"}"#.to_string(),
        };
        assert_eq!(err.detail(), r#"{"error":"unknown sku"}"#);
    }

    #[test]
    fn test_detail_falls_back_to_message() {
        let err = SyncError::Status {
            platform: Platform::Source,
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "  ".to_string(),
        };
        assert_eq!(err.detail(), "Shopify responded with 502 Bad Gateway");

        let err = SyncError::MissingConfig {
            field: "SHOPIFY_ACCESS_TOKEN".to_string(),
        };
        assert_eq!(err.detail(), "Missing configuration: SHOPIFY_ACCESS_TOKEN");
        assert!(err.is_config());
    }

    #[test]
    fn test_is_config_separates_startup_errors() {
        let schedule = SyncError::Schedule {
            expression: "every minute".to_string(),
            message: "bad field".to_string(),
        };
        let base_url = SyncError::InvalidConfigValue {
            field: "BackMarket base URL".to_string(),
            value: "mailto:ops@example.com".to_string(),
            reason: "URL cannot be used as a base".to_string(),
        };
        let remote = SyncError::Status {
            platform: Platform::Source,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        let io = SyncError::Io(std::io::Error::other("disk"));

        assert!(schedule.is_config());
        assert!(base_url.is_config());
        assert!(!remote.is_config());
        assert!(!io.is_config());
    }
}
