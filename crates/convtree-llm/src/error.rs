//! Provider error types.

use thiserror::Error;

/// Errors returned by a [`crate::Provider`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success status from the API
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The API rejected the credentials
    #[error("authentication failed")]
    Authentication,

    /// The configured key variable is unset
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),

    /// The response body did not match the expected shape
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The API answered without any message content
    #[error("provider returned no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Deserialization(e.to_string())
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ProviderError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn test_missing_key_names_variable() {
        let err = ProviderError::MissingApiKey("OPENAI_API_KEY".to_string());
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
