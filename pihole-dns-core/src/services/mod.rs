//! 业务逻辑服务层

mod cname_record_service;
mod dns_record_service;
mod listing_service;

pub use cname_record_service::CnameRecordService;
pub use dns_record_service::DnsRecordService;
pub use listing_service::ListingService;

use std::sync::Arc;

use pihole_dns_client::{LocalCnameApi, LocalDnsApi, PiholeClient};

use crate::config::{ProviderConfig, ReconcileSettings};
use crate::error::{CoreError, CoreResult};
use crate::guard::DeleteGuards;

/// 服务上下文 - 持有所有依赖
///
/// Built once per provider configuration and shared by every service.
pub struct ServiceContext {
    /// Address record API
    pub local_dns: Arc<dyn LocalDnsApi>,
    /// CNAME record API
    pub local_cname: Arc<dyn LocalCnameApi>,
    /// Per-kind delete locks
    pub delete_guards: DeleteGuards,
    pub settings: ReconcileSettings,
}

impl ServiceContext {
    #[must_use]
    pub fn new(
        local_dns: Arc<dyn LocalDnsApi>,
        local_cname: Arc<dyn LocalCnameApi>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            local_dns,
            local_cname,
            delete_guards: DeleteGuards::new(),
            settings,
        }
    }

    /// Both record APIs served by one client.
    #[must_use]
    pub fn from_client(client: Arc<PiholeClient>, settings: ReconcileSettings) -> Self {
        let local_cname: Arc<dyn LocalCnameApi> = client.clone();
        Self::new(client, local_cname, settings)
    }

    /// Validate `config` and build a client from it.
    ///
    /// Nothing is sent to the remote here; the session is established on
    /// first use.
    pub fn connect(config: &ProviderConfig) -> CoreResult<Self> {
        let connection = config.resolve()?;
        let client = PiholeClient::new(connection).map_err(|e| {
            log::error!("[pihole] client construction failed: {e}");
            CoreError::from(e)
        })?;
        Ok(Self::from_client(Arc::new(client), config.reconcile))
    }
}
