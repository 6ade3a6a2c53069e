//! Pi-hole v6 REST client

mod auth;
mod entries;
mod error;
mod http;
mod records;
mod transport;
mod types;

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::error::{PiholeError, Result};
use crate::http_client::DEFAULT_MAX_RETRIES;
use crate::traits::{LocalCnameApi, LocalDnsApi};
use crate::types::{ConnectionConfig, Credentials};

/// Header carrying the session id on authenticated requests.
pub(crate) const SID_HEADER: &str = "X-FTL-SID";

/// Authenticated session state. `sid` is `None` when the server runs without a password.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub sid: Option<String>,
}

/// Pi-hole API client
///
/// Implements [`LocalDnsApi`] and [`LocalCnameApi`]. Authentication happens
/// lazily on the first request unless a session id was supplied.
pub struct PiholeClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    credentials: Credentials,
    pub(crate) session: Mutex<Option<Session>>,
    pub(crate) max_retries: u32,
}

impl PiholeClient {
    /// Builds a client from a connection descriptor.
    ///
    /// Fails before any network traffic on an invalid URL or CA bundle.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.url)?;
        let http = transport::build_http_client(&config)?;

        let session = config
            .session_id
            .filter(|sid| !sid.is_empty())
            .map(|sid| {
                log::debug!("[pihole] Reusing pre-established session");
                Session { sid: Some(sid) }
            });

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials,
            session: Mutex::new(session),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Overrides the number of transport retries (0 disables retrying).
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Address record operations.
    pub fn local_dns(&self) -> &dyn LocalDnsApi {
        self
    }

    /// CNAME record operations.
    pub fn local_cname(&self) -> &dyn LocalCnameApi {
        self
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| PiholeError::InvalidParameter {
        param: "url".to_string(),
        detail: format!("'{raw}': {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PiholeError::InvalidParameter {
            param: "url".to_string(),
            detail: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
