//! LocalDnsApi / LocalCnameApi 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{PiholeError, Result};
use crate::traits::{ErrorContext, LocalCnameApi, LocalDnsApi};
use crate::types::{CnameRecord, DnsRecord, RecordKind};

use super::PiholeClient;
use super::entries::ConfigEntry;
use super::types::ConfigResponse;

fn collection_path(kind: RecordKind) -> String {
    format!("/api/config/dns/{}", kind.config_key())
}

fn entry_path(kind: RecordKind, raw_entry: &str) -> String {
    format!(
        "{}/{}",
        collection_path(kind),
        urlencoding::encode(raw_entry)
    )
}

fn not_found(kind: RecordKind, domain: &str) -> PiholeError {
    PiholeError::RecordNotFound {
        kind,
        domain: domain.to_string(),
        raw_message: None,
    }
}

impl PiholeClient {
    /// Raw config array for `kind`, in remote order.
    async fn fetch_entries(&self, kind: RecordKind) -> Result<Vec<String>> {
        let response: ConfigResponse = self
            .get_json(&collection_path(kind), &ErrorContext::default())
            .await?;

        let entries = match kind {
            RecordKind::Address => response.config.dns.hosts,
            RecordKind::Cname => response.config.dns.cname_records,
        };

        entries.ok_or_else(|| PiholeError::ParseError {
            detail: format!("response is missing dns.{}", kind.config_key()),
        })
    }

    async fn list_entries<T: ConfigEntry>(&self) -> Result<Vec<T>> {
        self.fetch_entries(T::KIND)
            .await?
            .iter()
            .map(|raw| T::parse_entry(raw))
            .collect()
    }

    /// First entry matching `domain`, with the raw string it was stored as.
    async fn find_entry<T: ConfigEntry>(&self, domain: &str) -> Result<(String, T)> {
        for raw in self.fetch_entries(T::KIND).await? {
            let record = match T::parse_entry(&raw) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("[pihole] Skipping unparseable {} entry: {e}", T::KIND);
                    continue;
                }
            };
            if record.domain().eq_ignore_ascii_case(domain) {
                return Ok((raw, record));
            }
        }
        Err(not_found(T::KIND, domain))
    }

    async fn create_entry<T: ConfigEntry>(&self, record: &T) -> Result<T> {
        let entry = record.to_entry();
        let context = ErrorContext::record(T::KIND, record.domain());

        match self
            .send(Method::PUT, &entry_path(T::KIND, &entry), &context)
            .await
        {
            Ok(_) => Ok(record.clone()),
            Err(PiholeError::RecordExists { .. }) => {
                // A retried PUT lands here once the first attempt went through.
                let (_, existing) = self.find_entry::<T>(record.domain()).await?;
                if existing.same_content(record) {
                    log::debug!("[pihole] {} entry '{entry}' already present", T::KIND);
                    Ok(existing)
                } else {
                    Err(PiholeError::RecordExists {
                        kind: T::KIND,
                        domain: record.domain().to_string(),
                        raw_message: Some(format!(
                            "conflicting entry '{}' already present",
                            existing.to_entry()
                        )),
                    })
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_entry<T: ConfigEntry>(&self, domain: &str) -> Result<()> {
        let (raw, _) = self.find_entry::<T>(domain).await?;
        let context = ErrorContext::record(T::KIND, domain);
        match self
            .send(Method::DELETE, &entry_path(T::KIND, &raw), &context)
            .await
        {
            Ok(_) => Ok(()),
            // A retried DELETE lands here once the first attempt went through.
            Err(e) if e.is_not_found() => {
                log::debug!("[pihole] {} entry '{raw}' already gone", T::KIND);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl LocalDnsApi for PiholeClient {
    async fn list(&self) -> Result<Vec<DnsRecord>> {
        self.list_entries::<DnsRecord>().await
    }

    async fn get(&self, domain: &str) -> Result<DnsRecord> {
        self.find_entry::<DnsRecord>(domain).await.map(|(_, record)| record)
    }

    async fn create(&self, record: &DnsRecord) -> Result<DnsRecord> {
        self.create_entry(record).await
    }

    async fn delete(&self, domain: &str) -> Result<()> {
        self.delete_entry::<DnsRecord>(domain).await
    }
}

#[async_trait]
impl LocalCnameApi for PiholeClient {
    async fn list(&self) -> Result<Vec<CnameRecord>> {
        self.list_entries::<CnameRecord>().await
    }

    async fn get(&self, domain: &str) -> Result<CnameRecord> {
        self.find_entry::<CnameRecord>(domain).await.map(|(_, record)| record)
    }

    async fn create(&self, record: &CnameRecord) -> Result<CnameRecord> {
        self.create_entry(record).await
    }

    async fn delete(&self, domain: &str) -> Result<()> {
        self.delete_entry::<CnameRecord>(domain).await
    }
}
