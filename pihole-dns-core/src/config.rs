//! Provider configuration and environment overrides

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use pihole_dns_client::{ConnectionConfig, Credentials, DEFAULT_URL};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const ENV_URL: &str = "PIHOLE_URL";
pub const ENV_PASSWORD: &str = "PIHOLE_PASSWORD";
pub const ENV_API_TOKEN: &str = "PIHOLE_API_TOKEN";
pub const ENV_CA_FILE: &str = "PIHOLE_CA_FILE";
/// Internal: pre-established session for test fixtures.
pub const ENV_SESSION_ID: &str = "__PIHOLE_SESSION_ID";

const DEFAULT_VISIBILITY_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Provider-level settings.
///
/// Values set explicitly always win; [`with_env_overrides`](Self::with_env_overrides)
/// only fills fields that are still unset.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ProviderConfig {
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub ca_file: Option<PathBuf>,
    #[serde(skip)]
    pub session_id: Option<String>,
    pub reconcile: ReconcileSettings,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("password", &redact(&self.password))
            .field("api_token", &redact(&self.api_token))
            .field("ca_file", &self.ca_file)
            .field("session_id", &redact(&self.session_id))
            .field("reconcile", &self.reconcile)
            .finish()
    }
}

impl ProviderConfig {
    /// Fill unset fields from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Fill unset fields from `lookup`. Empty values count as unset.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        fill(&mut self.url, || get(ENV_URL));
        fill(&mut self.password, || get(ENV_PASSWORD));
        fill(&mut self.api_token, || get(ENV_API_TOKEN));
        fill(&mut self.session_id, || get(ENV_SESSION_ID));
        if self.ca_file.is_none() {
            self.ca_file = get(ENV_CA_FILE).map(PathBuf::from);
        }
        self
    }

    /// Check exactly-one-of password / API token and pick the credentials.
    pub fn credentials(&self) -> CoreResult<Credentials> {
        let password = self.password.as_deref().filter(|v| !v.is_empty());
        let token = self.api_token.as_deref().filter(|v| !v.is_empty());
        match (password, token) {
            (Some(p), None) => Ok(Credentials::Password(p.to_string())),
            (None, Some(t)) => Ok(Credentials::ApiToken(t.to_string())),
            (Some(_), Some(_)) => Err(CoreError::Validation(
                "only one of password or api_token may be set".to_string(),
            )),
            (None, None) => Err(CoreError::Validation(format!(
                "one of password or api_token must be set (or {ENV_PASSWORD} / {ENV_API_TOKEN})"
            ))),
        }
    }

    /// Resolve into the descriptor used to build a client.
    pub fn resolve(&self) -> CoreResult<ConnectionConfig> {
        let credentials = self.credentials()?;
        let url = self
            .url
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_URL);

        let mut config = ConnectionConfig::new(url, credentials);
        config.ca_file.clone_from(&self.ca_file);
        config.session_id.clone_from(&self.session_id);
        config.user_agent = user_agent();
        Ok(config)
    }
}

fn fill(slot: &mut Option<String>, value: impl FnOnce() -> Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        *slot = value();
    }
}

/// `pihole-dns-core/<version> pihole-dns-client/<version>`
pub fn user_agent() -> String {
    format!(
        "{}/{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        pihole_dns_client::default_user_agent()
    )
}

/// Timing knobs for the reconcilers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileSettings {
    /// How long a created CNAME may take to show up in reads.
    pub visibility_timeout_ms: u64,
    /// Pause between visibility polls.
    pub poll_interval_ms: u64,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            visibility_timeout_ms: DEFAULT_VISIBILITY_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ReconcileSettings {
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_millis(self.visibility_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
