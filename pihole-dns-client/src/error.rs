use serde::{Deserialize, Serialize};

use crate::types::RecordKind;

/// Unified error type for all Pi-hole API operations.
///
/// All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient transport failures that may
/// succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): HTTP 429
///
/// The built-in HTTP layer retries these with exponential backoff. Business
/// errors such as [`RecordNotFound`](Self::RecordNotFound) are never retried
/// at the transport level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum PiholeError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The password, API token or session id was rejected.
    InvalidCredentials {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The session is valid but lacks permission for the request.
    PermissionDenied {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A record with the same entry already exists.
    RecordExists {
        /// Record kind the entry belongs to.
        kind: RecordKind,
        /// Domain of the conflicting record.
        domain: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// No record exists for the requested domain.
    ///
    /// Callers treat this as "absent" rather than as a failure in most flows.
    RecordNotFound {
        /// Record kind that was looked up.
        kind: RecordKind,
        /// Domain that was not found.
        domain: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (locally or by the API).
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse an API response or a config entry.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// The custom CA bundle could not be read.
    TrustBundleUnreadable {
        /// Path of the bundle.
        path: String,
        /// I/O error details.
        detail: String,
    },

    /// The custom CA bundle contained no usable PEM certificate.
    TrustBundleInvalid {
        /// Path of the bundle.
        path: String,
        /// Parser details, if any.
        detail: Option<String>,
    },

    /// The HTTP transport could not be built.
    ClientBuild {
        /// Builder error details.
        detail: String,
    },

    /// An unrecognized error from the API.
    Unknown {
        /// Raw error key from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl PiholeError {
    /// Whether the error is an expected outcome (bad input, absent record, ...).
    ///
    /// Used for log level selection: `warn` when `true`, `error` otherwise.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::RecordExists { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::TrustBundleUnreadable { .. }
                | Self::TrustBundleInvalid { .. }
        )
    }

    /// Whether this is the typed "record not found" signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }

    /// Whether the failure happened while constructing the client.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::TrustBundleUnreadable { .. }
                | Self::TrustBundleInvalid { .. }
                | Self::ClientBuild { .. }
        )
    }
}

impl std::fmt::Display for PiholeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::PermissionDenied { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Permission denied: {msg}")
                } else {
                    write!(f, "Permission denied")
                }
            }
            Self::RecordExists { kind, domain, .. } => {
                write!(f, "{kind} record '{domain}' already exists")
            }
            Self::RecordNotFound { kind, domain, .. } => {
                write!(f, "{kind} record '{domain}' not found")
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::TrustBundleUnreadable { path, detail } => {
                write!(f, "Failed to read CA file '{path}': {detail}")
            }
            Self::TrustBundleInvalid { path, detail } => {
                if let Some(detail) = detail {
                    write!(f, "Failed to parse CA file '{path}': {detail}")
                } else {
                    write!(f, "Failed to parse CA file '{path}': no certificates found")
                }
            }
            Self::ClientBuild { detail } => write!(f, "Failed to build HTTP client: {detail}"),
            Self::Unknown { raw_message, .. } => write!(f, "{raw_message}"),
        }
    }
}

impl std::error::Error for PiholeError {}

/// Convenience type alias for `Result<T, PiholeError>`.
pub type Result<T> = std::result::Result<T, PiholeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_record_not_found() {
        let e = PiholeError::RecordNotFound {
            kind: RecordKind::Cname,
            domain: "a.example.com".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "CNAME record 'a.example.com' not found");
    }

    #[test]
    fn display_record_exists() {
        let e = PiholeError::RecordExists {
            kind: RecordKind::Address,
            domain: "foo.com".to_string(),
            raw_message: Some("Item already present".to_string()),
        };
        assert_eq!(e.to_string(), "Local DNS record 'foo.com' already exists");
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = PiholeError::InvalidCredentials {
            raw_message: Some("Unauthorized".to_string()),
        };
        assert_eq!(e.to_string(), "Invalid credentials: Unauthorized");
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = PiholeError::RateLimited {
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "Rate limited (retry after 30s)");
    }

    #[test]
    fn display_trust_bundle_invalid_without_detail() {
        let e = PiholeError::TrustBundleInvalid {
            path: "/etc/ca.pem".to_string(),
            detail: None,
        };
        assert_eq!(
            e.to_string(),
            "Failed to parse CA file '/etc/ca.pem': no certificates found"
        );
    }

    #[test]
    fn display_unknown() {
        let e = PiholeError::Unknown {
            raw_code: Some("database_error".to_string()),
            raw_message: "something broke".to_string(),
        };
        assert_eq!(e.to_string(), "something broke");
    }

    #[test]
    fn serialize_tags_variant_code() {
        let e = PiholeError::RecordNotFound {
            kind: RecordKind::Address,
            domain: "foo.com".to_string(),
            raw_message: None,
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"RecordNotFound\""));
        assert!(json.contains("\"kind\":\"address\""));
    }

    #[test]
    fn deserialize_restores_variant() {
        let original = PiholeError::TrustBundleUnreadable {
            path: "/missing.pem".to_string(),
            detail: "No such file or directory".to_string(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: PiholeError = serde_json::from_str(&json).unwrap();
        assert!(back.is_construction_error());
        assert_eq!(back.to_string(), original.to_string());
    }

    #[test]
    fn not_found_is_expected_but_network_is_not() {
        let nf = PiholeError::RecordNotFound {
            kind: RecordKind::Cname,
            domain: "x".into(),
            raw_message: None,
        };
        assert!(nf.is_expected());
        assert!(nf.is_not_found());

        let net = PiholeError::NetworkError {
            detail: "refused".into(),
        };
        assert!(!net.is_expected());
        assert!(!net.is_not_found());
    }
}
