//! Config array entry codec
//!
//! Pi-hole stores local records as plain strings:
//! - `dns.hosts`:        `"<ip> <domain>[ <ttl>][ #<comment>]"`
//! - `dns.cnameRecords`: `"<domain>,<target>[,<ttl>]"`

use crate::error::{PiholeError, Result};
use crate::types::{CnameRecord, DnsRecord, RecordKind};

/// A record kind stored as one string per entry in a Pi-hole config array.
pub(crate) trait ConfigEntry: Sized + Clone {
    const KIND: RecordKind;

    fn parse_entry(raw: &str) -> Result<Self>;

    fn to_entry(&self) -> String;

    fn domain(&self) -> &str;

    /// Same settable fields (read-only fields such as comments are ignored).
    fn same_content(&self, other: &Self) -> bool;
}

fn parse_error(kind: RecordKind, raw: &str, why: &str) -> PiholeError {
    PiholeError::ParseError {
        detail: format!("invalid {kind} entry '{raw}': {why}"),
    }
}

fn parse_ttl(kind: RecordKind, raw: &str, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|e| parse_error(kind, raw, &format!("bad ttl '{value}': {e}")))
}

impl ConfigEntry for DnsRecord {
    const KIND: RecordKind = RecordKind::Address;

    fn parse_entry(raw: &str) -> Result<Self> {
        let (body, comment) = match raw.split_once('#') {
            Some((body, comment)) => (body, comment.trim()),
            None => (raw, ""),
        };

        let mut tokens = body.split_whitespace();
        let ip = tokens
            .next()
            .ok_or_else(|| parse_error(Self::KIND, raw, "missing ip"))?;
        let domain = tokens
            .next()
            .ok_or_else(|| parse_error(Self::KIND, raw, "missing domain"))?;

        // Extra hostnames on the same line are aliases; only a numeric token is a TTL.
        let ttl = tokens
            .find(|t| t.bytes().all(|b| b.is_ascii_digit()))
            .map(|t| parse_ttl(Self::KIND, raw, t))
            .transpose()?;

        Ok(Self {
            domain: domain.to_string(),
            ip: ip.to_string(),
            ttl,
            comment: comment.to_string(),
        })
    }

    fn to_entry(&self) -> String {
        match self.ttl {
            Some(ttl) => format!("{} {} {ttl}", self.ip, self.domain),
            None => format!("{} {}", self.ip, self.domain),
        }
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn same_content(&self, other: &Self) -> bool {
        self.domain.eq_ignore_ascii_case(&other.domain)
            && self.ip == other.ip
            && self.ttl == other.ttl
    }
}

impl ConfigEntry for CnameRecord {
    const KIND: RecordKind = RecordKind::Cname;

    fn parse_entry(raw: &str) -> Result<Self> {
        let mut fields = raw.split(',').map(str::trim);

        let domain = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| parse_error(Self::KIND, raw, "missing domain"))?;
        let target = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| parse_error(Self::KIND, raw, "missing target"))?;
        let ttl = fields
            .next()
            .filter(|s| !s.is_empty())
            .map(|t| parse_ttl(Self::KIND, raw, t))
            .transpose()?;

        if fields.next().is_some() {
            return Err(parse_error(Self::KIND, raw, "too many fields"));
        }

        Ok(Self {
            domain: domain.to_string(),
            target: target.to_string(),
            ttl,
        })
    }

    fn to_entry(&self) -> String {
        match self.ttl {
            Some(ttl) => format!("{},{},{ttl}", self.domain, self.target),
            None => format!("{},{}", self.domain, self.target),
        }
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn same_content(&self, other: &Self) -> bool {
        self.domain.eq_ignore_ascii_case(&other.domain)
            && self.target.eq_ignore_ascii_case(&other.target)
            && self.ttl == other.ttl
    }
}
