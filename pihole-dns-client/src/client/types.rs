//! Pi-hole v6 API 类型定义

use serde::{Deserialize, Serialize};

/// `POST /api/auth` request body
#[derive(Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub password: &'a str,
}

/// `POST /api/auth` response
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub session: SessionInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionInfo {
    pub valid: bool,
    /// `null` when the server has no password configured
    pub sid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub key: String,
    pub message: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// `GET /api/config/dns/{hosts|cnameRecords}` response
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigResponse {
    pub config: ConfigSection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfigSection {
    pub dns: DnsSection,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DnsSection {
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
    #[serde(default, rename = "cnameRecords")]
    pub cname_records: Option<Vec<String>>,
}
