//! Address record reconciler

use std::sync::Arc;

use pihole_dns_client::RecordKind;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{DnsRecord, DnsRecordInput, PlanAction, ResourceState};

/// Lifecycle of one managed address record.
pub struct DnsRecordService {
    ctx: Arc<ServiceContext>,
}

impl DnsRecordService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 创建 DNS 记录
    ///
    /// Any remote error aborts, including not-found. The returned state holds
    /// what a read-back observed.
    pub async fn create(&self, input: &DnsRecordInput) -> CoreResult<ResourceState<DnsRecord>> {
        input.validate()?;
        let record = input.to_record();

        log::info!("[pihole] creating dns record {} -> {}", record.domain, record.ip);
        self.ctx.local_dns.create(&record).await?;

        let mut state = ResourceState::imported(record.domain);
        self.read(&mut state).await?;
        Ok(state)
    }

    /// Refresh `state` from the remote. A missing record clears it.
    pub async fn read(&self, state: &mut ResourceState<DnsRecord>) -> CoreResult<()> {
        let Some(domain) = state.id.clone() else {
            return Ok(());
        };

        match self.ctx.local_dns.get(&domain).await {
            Ok(record) => {
                state.attributes = Some(record);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                log::warn!("[pihole] dns record {domain} no longer exists, removing from state");
                state.clear();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 删除 DNS 记录
    ///
    /// Holds the address delete guard for the duration of the remote call.
    /// Errors (not-found included) are returned and leave `state` untouched.
    pub async fn delete(&self, state: &mut ResourceState<DnsRecord>) -> CoreResult<()> {
        let Some(domain) = state.id.clone() else {
            return Ok(());
        };

        {
            let _guard = self.ctx.delete_guards.acquire(RecordKind::Address).await;
            log::info!("[pihole] deleting dns record {domain}");
            self.ctx.local_dns.delete(&domain).await?;
        }

        state.clear();
        Ok(())
    }

    /// Adopt an existing record by domain. The next [`read`](Self::read) fills it in.
    pub fn import(&self, domain: &str) -> ResourceState<DnsRecord> {
        ResourceState::imported(domain)
    }

    /// Compare the last read against `desired`.
    pub fn plan(current: Option<&DnsRecord>, desired: &DnsRecordInput) -> PlanAction {
        match current {
            None => PlanAction::Create,
            Some(record) => PlanAction::from_changes(desired.changed_fields(record)),
        }
    }

    /// Delete the tracked record, then create `desired`.
    pub async fn replace(
        &self,
        state: &mut ResourceState<DnsRecord>,
        desired: &DnsRecordInput,
    ) -> CoreResult<()> {
        desired.validate()?;
        self.delete(state).await?;
        *state = self.create(desired).await?;
        Ok(())
    }

    /// Read, plan and carry out whatever moves `state` to `desired`.
    pub async fn apply(
        &self,
        state: &mut ResourceState<DnsRecord>,
        desired: &DnsRecordInput,
    ) -> CoreResult<PlanAction> {
        desired.validate()?;
        self.read(state).await?;

        let action = Self::plan(state.attributes.as_ref(), desired);
        match &action {
            PlanAction::Create => *state = self.create(desired).await?,
            PlanAction::Replace { fields } => {
                log::info!("[pihole] replacing dns record {} ({})", desired.domain, fields.join(", "));
                self.replace(state, desired).await?;
            }
            PlanAction::NoChange => {}
        }
        Ok(action)
    }
}
