//! # pihole-dns-client
//!
//! Typed client for the local DNS override table of a
//! [Pi-hole](https://pi-hole.net/) v6 server.
//!
//! ## Managed Record Kinds
//!
//! | Kind | Config array | Entry format |
//! |------|--------------|--------------|
//! | Address | `dns.hosts` | `<ip> <domain>[ <ttl>][ #<comment>]` |
//! | CNAME | `dns.cnameRecords` | `<domain>,<target>[,<ttl>]` |
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls for HTTPS.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pihole_dns_client::{ConnectionConfig, Credentials, DnsRecord, PiholeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new(
//!         "https://pi.hole",
//!         Credentials::Password("admin-password".to_string()),
//!     );
//!     let client = PiholeClient::new(config)?;
//!
//!     client
//!         .local_dns()
//!         .create(&DnsRecord::new("nas.lan", "192.168.1.10"))
//!         .await?;
//!
//!     for record in client.local_dns().list().await? {
//!         println!("{} -> {}", record.domain, record.ip);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, PiholeError>`](PiholeError).
//! [`PiholeError::RecordNotFound`] is the typed "absent" signal; transport
//! failures (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff before surfacing.

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::PiholeClient;
pub use error::{PiholeError, Result};
pub use traits::{LocalCnameApi, LocalDnsApi};
pub use types::{
    CnameRecord, ConnectionConfig, Credentials, DEFAULT_URL, DnsRecord, RecordKind,
    default_user_agent,
};
pub use utils::log_sanitizer;
