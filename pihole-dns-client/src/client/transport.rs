//! HTTP transport construction and custom CA handling

use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client};

use crate::error::{PiholeError, Result};
use crate::types::ConnectionConfig;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Builds the per-client transport.
///
/// A configured CA bundle replaces the built-in roots for this client only;
/// each call owns a fresh `ClientBuilder`, so nothing shared is touched.
pub(crate) fn build_http_client(config: &ConnectionConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(config.user_agent.as_str());

    if let Some(path) = &config.ca_file {
        let certs = load_trust_bundle(path)?;
        log::debug!(
            "[pihole] Using {} certificate(s) from {} as trust roots",
            certs.len(),
            path.display()
        );
        builder = builder.tls_built_in_root_certs(false);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    builder.build().map_err(|e| PiholeError::ClientBuild {
        detail: e.to_string(),
    })
}

/// Reads a PEM bundle. At least one certificate is required.
pub(crate) fn load_trust_bundle(path: &Path) -> Result<Vec<Certificate>> {
    let pem = std::fs::read(path).map_err(|e| PiholeError::TrustBundleUnreadable {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;

    let certs =
        Certificate::from_pem_bundle(&pem).map_err(|e| PiholeError::TrustBundleInvalid {
            path: path.display().to_string(),
            detail: Some(e.to_string()),
        })?;

    if certs.is_empty() {
        return Err(PiholeError::TrustBundleInvalid {
            path: path.display().to_string(),
            detail: None,
        });
    }

    Ok(certs)
}
