//! Pi-hole DNS Core Library
//!
//! Reconciles desired local DNS and CNAME records against a Pi-hole v6
//! server, on top of [`pihole_dns_client`]:
//!
//! - Address record lifecycle ([`DnsRecordService`])
//! - CNAME record lifecycle, including waiting for new records to become
//!   readable ([`CnameRecordService`])
//! - Read-only canonical listings with a content digest ([`ListingService`])
//!
//! Deletes of one record kind are serialized through the
//! [`DeleteGuards`] owned by each [`ServiceContext`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pihole_dns_core::{DnsRecordService, ProviderConfig, ServiceContext};
//! use pihole_dns_core::types::{DnsRecordInput, ResourceState};
//!
//! # async fn run() -> pihole_dns_core::CoreResult<()> {
//! let config = ProviderConfig::default().with_env_overrides();
//! let ctx = Arc::new(ServiceContext::connect(&config)?);
//!
//! let records = DnsRecordService::new(ctx);
//! let mut state = ResourceState::absent();
//! records
//!     .apply(&mut state, &DnsRecordInput::new("nas.lan", "192.168.1.10"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod listing;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ProviderConfig, ReconcileSettings};
pub use error::{CoreError, CoreResult};
pub use guard::{DeleteGuard, DeleteGuards};
pub use listing::{CanonicalRecord, RecordListing};
pub use services::{CnameRecordService, DnsRecordService, ListingService, ServiceContext};
pub use tokio_util::sync::CancellationToken;
