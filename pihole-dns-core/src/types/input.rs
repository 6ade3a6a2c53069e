use pihole_dns_client::{CnameRecord, DnsRecord};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Desired address record. Every field forces replacement when changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordInput {
    pub domain: String,
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl DnsRecordInput {
    pub fn new(domain: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ip: ip.into(),
            ttl: None,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        require("domain", &self.domain)?;
        require("ip", &self.ip)
    }

    pub fn to_record(&self) -> DnsRecord {
        DnsRecord {
            domain: self.domain.clone(),
            ip: self.ip.clone(),
            ttl: self.ttl,
            comment: String::new(),
        }
    }

    /// Fields that differ from `current`. An unset TTL accepts whatever the remote reports.
    pub fn changed_fields(&self, current: &DnsRecord) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.domain != current.domain {
            fields.push("domain");
        }
        if self.ip != current.ip {
            fields.push("ip");
        }
        if self.ttl.is_some() && self.ttl != current.ttl {
            fields.push("ttl");
        }
        fields
    }
}

/// Desired CNAME record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameRecordInput {
    pub domain: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl CnameRecordInput {
    pub fn new(domain: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            target: target.into(),
            ttl: None,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        require("domain", &self.domain)?;
        require("target", &self.target)
    }

    pub fn to_record(&self) -> CnameRecord {
        CnameRecord {
            domain: self.domain.clone(),
            target: self.target.clone(),
            ttl: self.ttl,
        }
    }

    pub fn changed_fields(&self, current: &CnameRecord) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.domain != current.domain {
            fields.push("domain");
        }
        if self.target != current.target {
            fields.push("target");
        }
        if self.ttl.is_some() && self.ttl != current.ttl {
            fields.push("ttl");
        }
        fields
    }
}

fn require(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
