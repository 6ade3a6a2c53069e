//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use pihole_dns_client::{PiholeError, RecordKind};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Rejected input or configuration, raised before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A created record never showed up in the remote listing
    #[error("{kind} record '{domain}' did not become visible within {timeout_ms}ms")]
    VisibilityTimeout {
        kind: RecordKind,
        domain: String,
        timeout_ms: u64,
    },

    /// The caller cancelled while waiting on the remote
    #[error("Cancelled while waiting for {kind} record '{domain}'")]
    Cancelled { kind: RecordKind, domain: String },

    /// Client error (converted from the API layer)
    #[error("{0}")]
    Provider(#[from] PiholeError),
}

impl CoreError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Cancelled { .. } => true,
            Self::VisibilityTimeout { .. } => false,
            Self::Provider(e) => e.is_expected(),
        }
    }

    /// Whether this is the remote's typed "absent" signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_not_found())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
