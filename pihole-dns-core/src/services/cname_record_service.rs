//! CNAME record reconciler

use std::sync::Arc;

use pihole_dns_client::RecordKind;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{CnameRecord, CnameRecordInput, PlanAction, ResourceState};

/// Lifecycle of one managed CNAME record.
///
/// Pi-hole may answer a CNAME create before the entry shows up in reads, and
/// sometimes answers it with not-found even though the write landed. Creation
/// therefore polls until the record is readable.
pub struct CnameRecordService {
    ctx: Arc<ServiceContext>,
}

impl CnameRecordService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 创建 CNAME 记录并等待其可见
    pub async fn create(
        &self,
        input: &CnameRecordInput,
        cancel: &CancellationToken,
    ) -> CoreResult<ResourceState<CnameRecord>> {
        input.validate()?;
        let record = input.to_record();

        log::info!("[pihole] creating cname record {} -> {}", record.domain, record.target);
        match self.ctx.local_cname.create(&record).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                log::warn!("[pihole] cname create for {} answered not found, polling: {e}", record.domain);
            }
            Err(e) => return Err(e.into()),
        }

        let visible = self.await_visible(&record.domain, cancel).await?;
        Ok(ResourceState::visible(record.domain, visible))
    }

    /// Poll `get(domain)` until it succeeds, the visibility timeout passes,
    /// or `cancel` fires. Not-found is retried; other errors end the wait.
    async fn await_visible(
        &self,
        domain: &str,
        cancel: &CancellationToken,
    ) -> CoreResult<CnameRecord> {
        let timeout = self.ctx.settings.visibility_timeout();
        let interval = self.ctx.settings.poll_interval();
        let deadline = Instant::now() + timeout;
        let cancelled = || CoreError::Cancelled {
            kind: RecordKind::Cname,
            domain: domain.to_string(),
        };

        loop {
            let attempt = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled()),
                res = self.ctx.local_cname.get(domain) => res,
            };

            match attempt {
                Ok(record) => return Ok(record),
                Err(e) if e.is_not_found() => {
                    log::debug!("[pihole] cname record {domain} not visible yet");
                }
                Err(e) => return Err(e.into()),
            }

            let now = Instant::now();
            if now >= deadline {
                log::error!("[pihole] cname record {domain} not visible after {timeout:?}");
                return Err(CoreError::VisibilityTimeout {
                    kind: RecordKind::Cname,
                    domain: domain.to_string(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled()),
                () = tokio::time::sleep(interval.min(deadline - now)) => {}
            }
        }
    }

    /// Refresh `state` from the remote. A missing record clears it.
    pub async fn read(&self, state: &mut ResourceState<CnameRecord>) -> CoreResult<()> {
        let Some(domain) = state.id.clone() else {
            return Ok(());
        };

        match self.ctx.local_cname.get(&domain).await {
            Ok(record) => {
                state.attributes = Some(record);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                log::warn!("[pihole] cname record {domain} no longer exists, removing from state");
                state.clear();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 删除 CNAME 记录
    pub async fn delete(&self, state: &mut ResourceState<CnameRecord>) -> CoreResult<()> {
        let Some(domain) = state.id.clone() else {
            return Ok(());
        };

        {
            let _guard = self.ctx.delete_guards.acquire(RecordKind::Cname).await;
            log::info!("[pihole] deleting cname record {domain}");
            self.ctx.local_cname.delete(&domain).await?;
        }

        state.clear();
        Ok(())
    }

    pub fn import(&self, domain: &str) -> ResourceState<CnameRecord> {
        ResourceState::imported(domain)
    }

    pub fn plan(current: Option<&CnameRecord>, desired: &CnameRecordInput) -> PlanAction {
        match current {
            None => PlanAction::Create,
            Some(record) => PlanAction::from_changes(desired.changed_fields(record)),
        }
    }

    /// Delete the tracked record, then create `desired`.
    pub async fn replace(
        &self,
        state: &mut ResourceState<CnameRecord>,
        desired: &CnameRecordInput,
        cancel: &CancellationToken,
    ) -> CoreResult<()> {
        desired.validate()?;
        self.delete(state).await?;
        *state = self.create(desired, cancel).await?;
        Ok(())
    }

    /// Read, plan and carry out whatever moves `state` to `desired`.
    pub async fn apply(
        &self,
        state: &mut ResourceState<CnameRecord>,
        desired: &CnameRecordInput,
        cancel: &CancellationToken,
    ) -> CoreResult<PlanAction> {
        desired.validate()?;
        self.read(state).await?;

        let action = Self::plan(state.attributes.as_ref(), desired);
        match &action {
            PlanAction::Create => *state = self.create(desired, cancel).await?,
            PlanAction::Replace { fields } => {
                log::info!("[pihole] replacing cname record {} ({})", desired.domain, fields.join(", "));
                self.replace(state, desired, cancel).await?;
            }
            PlanAction::NoChange => {}
        }
        Ok(action)
    }
}
