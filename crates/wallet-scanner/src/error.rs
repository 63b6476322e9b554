//! Error Types for Wallet Scanner

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScannerError>;

#[derive(Error, Debug)]
pub enum ScannerError {
    /// User text is not a wallet address
    #[error("Invalid wallet address: {0}")]
    InvalidFormat(String),

    /// Bad internal parameter (caller bug, never shown to users)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{service} returned HTTP {status}: {reason}")]
    Upstream {
        service: &'static str,
        status: u16,
        reason: String,
    },

    #[error("{0} request timed out")]
    Timeout(&'static str),

    #[error("Malformed response from {service}: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Every required upstream call for a request failed
    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScannerError {
    /// Wrap a transport error, keeping timeouts distinct
    pub fn from_transport(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScannerError::Timeout(service)
        } else if err.is_decode() {
            ScannerError::Malformed {
                service,
                reason: err.to_string(),
            }
        } else {
            ScannerError::Network(err)
        }
    }

    /// Upstream HTTP, timeout or parse failure
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            ScannerError::Upstream { .. }
                | ScannerError::Timeout(_)
                | ScannerError::Malformed { .. }
                | ScannerError::Network(_)
        )
    }

    /// Check if a single retry may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ScannerError::Timeout(_) => true,
            ScannerError::Network(e) => e.is_connect() || e.is_timeout(),
            ScannerError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ScannerError::InvalidFormat(_) => {
                "That doesn't look like a valid wallet address.".into()
            }
            ScannerError::Timeout(service) => {
                format!("{} took too long to answer. Please try again.", service)
            }
            ScannerError::ServiceUnavailable => {
                "Data services are unavailable right now. Please try again later.".into()
            }
            e if e.is_api_error() => "A data provider returned an error.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_family() {
        let upstream = ScannerError::Upstream {
            service: "etherscan",
            status: 502,
            reason: "Bad Gateway".into(),
        };
        assert!(upstream.is_api_error());
        assert!(upstream.is_retryable());
        assert!(ScannerError::Timeout("coingecko").is_api_error());

        assert!(!ScannerError::InvalidFormat("0x123".into()).is_api_error());
        assert!(!ScannerError::InvalidArgument("top_n".into()).is_retryable());
        assert!(!ScannerError::ServiceUnavailable.is_api_error());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ScannerError::ServiceUnavailable.user_message(),
            "Data services are unavailable right now. Please try again later."
        );
        assert_eq!(
            ScannerError::Timeout("etherscan").user_message(),
            "etherscan took too long to answer. Please try again."
        );
        let malformed = ScannerError::Malformed {
            service: "dexscreener",
            reason: "missing field".into(),
        };
        assert_eq!(malformed.user_message(), "A data provider returned an error.");
    }

    #[test]
    fn test_client_errors_not_retried() {
        let err = ScannerError::Upstream {
            service: "etherscan",
            status: 403,
            reason: "Forbidden".into(),
        };
        assert!(!err.is_retryable());
    }
}
