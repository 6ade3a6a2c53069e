//! Per-kind delete serialization

use std::sync::Arc;

use pihole_dns_client::RecordKind;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One exclusive lock per record kind.
///
/// Pi-hole rewrites the whole config array on every delete, so two deletes
/// of the same kind racing each other can lose one removal. Owned by the
/// [`ServiceContext`](crate::ServiceContext); reads, creates and listings
/// never touch it.
#[derive(Debug, Default)]
pub struct DeleteGuards {
    address: Arc<Mutex<()>>,
    cname: Arc<Mutex<()>>,
}

impl DeleteGuards {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, kind: RecordKind) -> Arc<Mutex<()>> {
        match kind {
            RecordKind::Address => Arc::clone(&self.address),
            RecordKind::Cname => Arc::clone(&self.cname),
        }
    }

    /// Wait for exclusive delete access to `kind`.
    ///
    /// Access is released when the returned guard drops, including on error
    /// paths and when the owning future is cancelled.
    pub async fn acquire(&self, kind: RecordKind) -> DeleteGuard {
        let inner = self.lock_for(kind).lock_owned().await;
        log::debug!("[pihole] {kind} delete guard acquired");
        DeleteGuard { kind, _inner: inner }
    }
}

/// RAII handle for a held delete lock.
#[derive(Debug)]
pub struct DeleteGuard {
    kind: RecordKind,
    _inner: OwnedMutexGuard<()>,
}

impl DeleteGuard {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

impl Drop for DeleteGuard {
    fn drop(&mut self) {
        log::debug!("[pihole] {} delete guard released", self.kind);
    }
}
