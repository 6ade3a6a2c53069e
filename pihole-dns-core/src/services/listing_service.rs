//! Read-only listings of every record of one kind

use std::sync::Arc;

use crate::error::CoreResult;
use crate::listing::RecordListing;
use crate::services::ServiceContext;
use crate::types::{CnameRecord, DnsRecord};

/// Canonical snapshots of the remote record sets.
///
/// Each call lists the remote afresh. A failed listing is returned as is,
/// never as a partial result.
pub struct ListingService {
    ctx: Arc<ServiceContext>,
}

impl ListingService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出所有本地 DNS 记录
    pub async fn dns_records(&self) -> CoreResult<RecordListing<DnsRecord>> {
        let records = self.ctx.local_dns.list().await?;
        let listing = RecordListing::canonicalize(records);
        log::debug!("[pihole] listed {} dns records (id {})", listing.len(), listing.id);
        Ok(listing)
    }

    /// 列出所有 CNAME 记录
    pub async fn cname_records(&self) -> CoreResult<RecordListing<CnameRecord>> {
        let records = self.ctx.local_cname.list().await?;
        let listing = RecordListing::canonicalize(records);
        log::debug!("[pihole] listed {} cname records (id {})", listing.len(), listing.id);
        Ok(listing)
    }
}
