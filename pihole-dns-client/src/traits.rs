use async_trait::async_trait;

use crate::error::{PiholeError, Result};
use crate::types::{CnameRecord, DnsRecord, RecordKind};

/// 原始 API 错误（内部使用）
///
/// Pi-hole reports failures as `{"error": {"key": .., "message": .., "hint": ..}}`.
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status of the failed response
    pub status: u16,
    /// `error.key`
    pub key: Option<String>,
    /// `error.message`
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            key: None,
            message: message.into(),
        }
    }

    pub fn with_key(status: u16, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            key: Some(key.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    pub kind: Option<RecordKind>,
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn record(kind: RecordKind, domain: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            domain: Some(domain.into()),
        }
    }
}

/// Maps raw API failures onto [`PiholeError`].
pub(crate) trait PiholeErrorMapper {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> PiholeError;

    fn unknown_error(&self, raw: RawApiError) -> PiholeError {
        PiholeError::Unknown {
            raw_code: raw.key,
            raw_message: raw.message,
        }
    }
}

/// Local DNS (address) record operations.
///
/// Records are addressed by domain; when the remote table holds several
/// entries for one domain, the first in remote order wins.
#[async_trait]
pub trait LocalDnsApi: Send + Sync {
    /// All address records in remote order.
    async fn list(&self) -> Result<Vec<DnsRecord>>;

    /// The record for `domain`, or [`PiholeError::RecordNotFound`].
    async fn get(&self, domain: &str) -> Result<DnsRecord>;

    /// Adds `record`. Re-adding an identical entry is a no-op.
    async fn create(&self, record: &DnsRecord) -> Result<DnsRecord>;

    /// Removes the record for `domain`.
    async fn delete(&self, domain: &str) -> Result<()>;
}

/// Local CNAME record operations.
#[async_trait]
pub trait LocalCnameApi: Send + Sync {
    async fn list(&self) -> Result<Vec<CnameRecord>>;

    async fn get(&self, domain: &str) -> Result<CnameRecord>;

    async fn create(&self, record: &CnameRecord) -> Result<CnameRecord>;

    async fn delete(&self, domain: &str) -> Result<()>;
}
