//! 测试辅助模块
//!
//! In-memory Pi-hole with error injection and delete instrumentation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pihole_dns_client::{
    CnameRecord, DnsRecord, LocalCnameApi, LocalDnsApi, PiholeError, RecordKind, Result,
};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::config::ReconcileSettings;
use crate::services::ServiceContext;

/// One observed remote delete call.
#[derive(Debug, Clone)]
pub struct DeleteSpan {
    pub kind: RecordKind,
    pub domain: String,
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Default)]
struct Faults {
    list: Option<PiholeError>,
    get: Option<PiholeError>,
    /// (error, whether the write still lands)
    create: Option<(PiholeError, bool)>,
    delete: Option<PiholeError>,
}

pub struct FakePihole {
    dns: RwLock<Vec<DnsRecord>>,
    cname: RwLock<Vec<CnameRecord>>,
    faults: Mutex<Faults>,
    hidden_cname_reads: AtomicUsize,
    delete_delay: Duration,
    calls: AtomicUsize,
    cname_gets: AtomicUsize,
    active_deletes: AtomicUsize,
    max_active_deletes: AtomicUsize,
    deletes: Mutex<Vec<DeleteSpan>>,
}

impl FakePihole {
    pub fn new() -> Self {
        Self {
            dns: RwLock::new(Vec::new()),
            cname: RwLock::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
            hidden_cname_reads: AtomicUsize::new(0),
            delete_delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            cname_gets: AtomicUsize::new(0),
            active_deletes: AtomicUsize::new(0),
            max_active_deletes: AtomicUsize::new(0),
            deletes: Mutex::new(Vec::new()),
        }
    }

    /// Every delete sleeps this long while "in flight".
    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = delay;
        self
    }

    pub async fn seed_dns(&self, record: DnsRecord) {
        self.dns.write().await.push(record);
    }

    pub async fn seed_cname(&self, record: CnameRecord) {
        self.cname.write().await.push(record);
    }

    pub async fn dns_records(&self) -> Vec<DnsRecord> {
        self.dns.read().await.clone()
    }

    pub async fn cname_records(&self) -> Vec<CnameRecord> {
        self.cname.read().await.clone()
    }

    pub async fn fail_next_list(&self, err: PiholeError) {
        self.faults.lock().await.list = Some(err);
    }

    pub async fn fail_next_get(&self, err: PiholeError) {
        self.faults.lock().await.get = Some(err);
    }

    /// Next create returns `err` without writing.
    pub async fn fail_next_create(&self, err: PiholeError) {
        self.faults.lock().await.create = Some((err, false));
    }

    /// Next create writes the record, then still returns `err`.
    pub async fn fail_next_create_after_write(&self, err: PiholeError) {
        self.faults.lock().await.create = Some((err, true));
    }

    pub async fn fail_next_delete(&self, err: PiholeError) {
        self.faults.lock().await.delete = Some(err);
    }

    /// The next `n` CNAME gets report not-found regardless of contents.
    pub fn hide_cnames_for_reads(&self, n: usize) {
        self.hidden_cname_reads.store(n, Ordering::SeqCst);
    }

    /// Remote calls of any kind so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn cname_get_count(&self) -> usize {
        self.cname_gets.load(Ordering::SeqCst)
    }

    /// Highest number of deletes observed in flight at once.
    pub fn max_concurrent_deletes(&self) -> usize {
        self.max_active_deletes.load(Ordering::SeqCst)
    }

    pub async fn delete_spans(&self) -> Vec<DeleteSpan> {
        self.deletes.lock().await.clone()
    }

    /// Returns the injected error, if any, and whether the write should land.
    async fn take_create_fault(&self) -> (Option<PiholeError>, bool) {
        match self.faults.lock().await.create.take() {
            Some((err, lands)) => (Some(err), lands),
            None => (None, true),
        }
    }

    /// `remove` is only polled when no delete fault is pending.
    async fn instrumented_delete<F>(&self, kind: RecordKind, domain: &str, remove: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        let active = self.active_deletes.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_deletes.fetch_max(active, Ordering::SeqCst);

        if !self.delete_delay.is_zero() {
            tokio::time::sleep(self.delete_delay).await;
        }
        let fault = self.faults.lock().await.delete.take();
        let result = match fault {
            Some(err) => Err(err),
            None => remove.await,
        };

        self.active_deletes.fetch_sub(1, Ordering::SeqCst);
        self.deletes.lock().await.push(DeleteSpan {
            kind,
            domain: domain.to_string(),
            started,
            finished: Instant::now(),
        });
        result
    }
}

fn not_found(kind: RecordKind, domain: &str) -> PiholeError {
    PiholeError::RecordNotFound {
        kind,
        domain: domain.to_string(),
        raw_message: None,
    }
}

fn exists(kind: RecordKind, domain: &str) -> PiholeError {
    PiholeError::RecordExists {
        kind,
        domain: domain.to_string(),
        raw_message: Some("Item already present".to_string()),
    }
}

#[async_trait]
impl LocalDnsApi for FakePihole {
    async fn list(&self) -> Result<Vec<DnsRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.faults.lock().await.list.take() {
            return Err(err);
        }
        Ok(self.dns.read().await.clone())
    }

    async fn get(&self, domain: &str) -> Result<DnsRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.faults.lock().await.get.take() {
            return Err(err);
        }
        self.dns
            .read()
            .await
            .iter()
            .find(|r| r.domain.eq_ignore_ascii_case(domain))
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Address, domain))
    }

    async fn create(&self, record: &DnsRecord) -> Result<DnsRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (fault, lands) = self.take_create_fault().await;
        if lands {
            let mut dns = self.dns.write().await;
            let identical = dns
                .iter()
                .find(|r| r.domain.eq_ignore_ascii_case(&record.domain))
                .map(|r| r.ip == record.ip && r.ttl == record.ttl);
            match identical {
                Some(true) => {}
                Some(false) => return Err(exists(RecordKind::Address, &record.domain)),
                None => dns.push(record.clone()),
            }
        }

        match fault {
            Some(err) => Err(err),
            None => Ok(record.clone()),
        }
    }

    async fn delete(&self, domain: &str) -> Result<()> {
        let remove = async {
            let mut dns = self.dns.write().await;
            let idx = dns
                .iter()
                .position(|r| r.domain.eq_ignore_ascii_case(domain))
                .ok_or_else(|| not_found(RecordKind::Address, domain))?;
            dns.remove(idx);
            Ok(())
        };
        self.instrumented_delete(RecordKind::Address, domain, remove)
            .await
    }
}

#[async_trait]
impl LocalCnameApi for FakePihole {
    async fn list(&self) -> Result<Vec<CnameRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.faults.lock().await.list.take() {
            return Err(err);
        }
        Ok(self.cname.read().await.clone())
    }

    async fn get(&self, domain: &str) -> Result<CnameRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cname_gets.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.faults.lock().await.get.take() {
            return Err(err);
        }
        let hidden = self
            .hidden_cname_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if hidden {
            return Err(not_found(RecordKind::Cname, domain));
        }
        self.cname
            .read()
            .await
            .iter()
            .find(|r| r.domain.eq_ignore_ascii_case(domain))
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Cname, domain))
    }

    async fn create(&self, record: &CnameRecord) -> Result<CnameRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (fault, lands) = self.take_create_fault().await;
        if lands {
            let mut cname = self.cname.write().await;
            let identical = cname
                .iter()
                .find(|r| r.domain.eq_ignore_ascii_case(&record.domain))
                .map(|r| r.target == record.target && r.ttl == record.ttl);
            match identical {
                Some(true) => {}
                Some(false) => return Err(exists(RecordKind::Cname, &record.domain)),
                None => cname.push(record.clone()),
            }
        }

        match fault {
            Some(err) => Err(err),
            None => Ok(record.clone()),
        }
    }

    async fn delete(&self, domain: &str) -> Result<()> {
        let remove = async {
            let mut cname = self.cname.write().await;
            let idx = cname
                .iter()
                .position(|r| r.domain.eq_ignore_ascii_case(domain))
                .ok_or_else(|| not_found(RecordKind::Cname, domain))?;
            cname.remove(idx);
            Ok(())
        };
        self.instrumented_delete(RecordKind::Cname, domain, remove)
            .await
    }
}

/// Context wired to `fake` with default timing.
pub fn service_context(fake: &Arc<FakePihole>) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(
        fake.clone(),
        fake.clone(),
        ReconcileSettings::default(),
    ))
}
