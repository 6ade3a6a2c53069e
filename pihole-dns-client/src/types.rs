//! Public record and connection types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default Pi-hole endpoint when none is configured.
pub const DEFAULT_URL: &str = "http://pi.hole";

/// The two record kinds served by Pi-hole's local override table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Domain to IP mapping (`dns.hosts`).
    Address,
    /// Domain to domain alias (`dns.cnameRecords`).
    Cname,
}

impl RecordKind {
    /// Name of the Pi-hole config array holding this kind.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Address => "hosts",
            Self::Cname => "cnameRecords",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "Local DNS"),
            Self::Cname => write!(f, "CNAME"),
        }
    }
}

/// A local DNS (address) record.
///
/// `ttl` is tri-state: `None` means the remote entry carries no explicit TTL,
/// `Some(0)` is an explicit zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub domain: String,
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub comment: String,
}

impl DnsRecord {
    pub fn new(domain: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ip: ip.into(),
            ttl: None,
            comment: String::new(),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// A local CNAME record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameRecord {
    pub domain: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl CnameRecord {
    pub fn new(domain: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            target: target.into(),
            ttl: None,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Authentication material. Exactly one kind is ever present.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Web interface password.
    Password(String),
    /// Application password / API token.
    ApiToken(String),
}

impl Credentials {
    pub(crate) fn secret(&self) -> &str {
        match self {
            Self::Password(s) | Self::ApiToken(s) => s,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::ApiToken(_) => f.write_str("ApiToken(<redacted>)"),
        }
    }
}

/// Everything needed to build one [`PiholeClient`](crate::PiholeClient).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL, e.g. `https://pi.hole`.
    pub url: String,
    pub credentials: Credentials,
    /// PEM bundle replacing the built-in root store.
    pub ca_file: Option<PathBuf>,
    /// Pre-established session id; skips the `/api/auth` handshake.
    pub session_id: Option<String>,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            ca_file: None,
            session_id: None,
            user_agent: default_user_agent(),
        }
    }
}

/// `pihole-dns-client/<version>`
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
