// =================================================================
// exchange/errors.rs - Error Types
// =================================================================

use thiserror::Error;

/// Failure of the underlying HTTP transport, before any status is known
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Every way a single Binance request can fail.
///
/// The `Display` text of each variant is the message handed back to the
/// tool caller, so the wording is part of the contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("API secret is required for authenticated requests")]
    MissingSecret,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Rate limit exceeded. Error details: {0}")]
    RateLimited(String),

    #[error("IP has been auto-banned for violating rate limits. Error details: {0}")]
    AutoBanned(String),

    #[error("WAF limit exceeded or API key invalid. Error details: {0}")]
    Forbidden(String),

    #[error("HTTP error occurred: {status} {reason} - Response: {body}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Request timed out after {0} seconds. The Binance API may be experiencing delays.")]
    Timeout(u64),

    #[error("Failed to connect to Binance API. Please check your internet connection.")]
    Connect,

    #[error("Unexpected error occurred: {0}")]
    Unexpected(String),
}

impl RequestError {
    /// Build the error for a non-2xx status, checking the statuses Binance
    /// uses for rate limiting before falling back to the generic case.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => RequestError::RateLimited(body),
            418 => RequestError::AutoBanned(body),
            403 => RequestError::Forbidden(body),
            _ => RequestError::Http {
                status,
                reason: reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown Status")
                    .to_string(),
                body,
            },
        }
    }

    /// HTTP status attached to this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::RateLimited(_) => Some(429),
            RequestError::AutoBanned(_) => Some(418),
            RequestError::Forbidden(_) => Some(403),
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority() {
        assert!(matches!(
            RequestError::from_status(429, "slow down".into()),
            RequestError::RateLimited(_)
        ));
        assert!(matches!(
            RequestError::from_status(418, "banned".into()),
            RequestError::AutoBanned(_)
        ));
        assert!(matches!(
            RequestError::from_status(403, "waf".into()),
            RequestError::Forbidden(_)
        ));
    }

    #[test]
    fn test_generic_status_message() {
        let err = RequestError::from_status(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#.into());
        let msg = err.to_string();

        assert!(msg.starts_with("HTTP error occurred: 400 Bad Request"));
        assert!(msg.contains("Invalid symbol."));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_messages_include_body() {
        let msg = RequestError::from_status(429, "too many".into()).to_string();
        assert_eq!(msg, "Rate limit exceeded. Error details: too many");

        let msg = RequestError::from_status(418, "teapot".into()).to_string();
        assert!(msg.contains("auto-banned"));
        assert!(msg.ends_with("teapot"));
    }

    #[test]
    fn test_timeout_message_uses_configured_seconds() {
        assert_eq!(
            RequestError::Timeout(30).to_string(),
            "Request timed out after 30 seconds. The Binance API may be experiencing delays."
        );
    }
}
