//! Canonical listings
//!
//! A listing is the full remote set of one record kind, sorted into a total
//! order and identified by a SHA-256 digest of its contents. Two remotes
//! holding the same multiset of entries produce the same listing and id,
//! whatever order the config array stores them in.

use pihole_dns_client::{CnameRecord, DnsRecord};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Records that can take part in a canonical listing.
pub trait CanonicalRecord {
    /// Field values in digest order: domain, secondary field, ttl, then any extras.
    ///
    /// Sorting compares these left to right, so domain and the secondary
    /// field lead and the rest only break ties.
    fn canonical_fields(&self) -> Vec<String>;
}

fn ttl_field(ttl: Option<u32>) -> String {
    ttl.map(|t| t.to_string()).unwrap_or_default()
}

impl CanonicalRecord for DnsRecord {
    fn canonical_fields(&self) -> Vec<String> {
        vec![
            self.domain.clone(),
            self.ip.clone(),
            ttl_field(self.ttl),
            self.comment.clone(),
        ]
    }
}

impl CanonicalRecord for CnameRecord {
    fn canonical_fields(&self) -> Vec<String> {
        vec![
            self.domain.clone(),
            self.target.clone(),
            ttl_field(self.ttl),
        ]
    }
}

/// Read-only snapshot of one record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordListing<T> {
    /// Lowercase hex SHA-256 of the sorted records.
    pub id: String,
    pub records: Vec<T>,
}

impl<T: CanonicalRecord> RecordListing<T> {
    /// Sort `records` canonically and compute the digest.
    pub fn canonicalize(records: Vec<T>) -> Self {
        let mut keyed: Vec<(Vec<String>, T)> = records
            .into_iter()
            .map(|r| (r.canonical_fields(), r))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = Sha256::new();
        for (fields, _) in &keyed {
            for field in fields {
                hasher.update(field.as_bytes());
                hasher.update([0u8]);
            }
        }

        Self {
            id: hex::encode(hasher.finalize()),
            records: keyed.into_iter().map(|(_, r)| r).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<DnsRecord> {
        vec![
            DnsRecord::new("b.lan", "10.0.0.2"),
            DnsRecord::new("a.lan", "10.0.0.9").with_ttl(300),
            DnsRecord::new("a.lan", "10.0.0.1"),
        ]
    }

    #[test]
    fn sorts_by_domain_then_ip() {
        let listing = RecordListing::canonicalize(hosts());
        let order: Vec<_> = listing
            .records
            .iter()
            .map(|r| (r.domain.as_str(), r.ip.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("a.lan", "10.0.0.1"), ("a.lan", "10.0.0.9"), ("b.lan", "10.0.0.2")]
        );
    }

    #[test]
    fn digest_ignores_remote_order() {
        let mut reversed = hosts();
        reversed.reverse();
        assert_eq!(
            RecordListing::canonicalize(hosts()),
            RecordListing::canonicalize(reversed)
        );
    }

    #[test]
    fn any_field_change_changes_digest() {
        let base = RecordListing::canonicalize(hosts()).id;

        let mut changed_ip = hosts();
        changed_ip[0].ip = "10.0.0.3".to_string();
        let mut changed_ttl = hosts();
        changed_ttl[0].ttl = Some(0);
        let mut changed_comment = hosts();
        changed_comment[0].comment = "nas".to_string();
        let mut changed_domain = hosts();
        changed_domain[0].domain = "c.lan".to_string();

        for variant in [changed_ip, changed_ttl, changed_comment, changed_domain] {
            assert_ne!(RecordListing::canonicalize(variant).id, base);
        }
    }

    #[test]
    fn unset_and_zero_ttl_digest_differently() {
        let unset = RecordListing::canonicalize(vec![CnameRecord::new("a.lan", "b.lan")]);
        let zero = RecordListing::canonicalize(vec![CnameRecord::new("a.lan", "b.lan").with_ttl(0)]);
        assert_ne!(unset.id, zero.id);
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let left = RecordListing::canonicalize(vec![CnameRecord::new("ab.lan", "c")]);
        let right = RecordListing::canonicalize(vec![CnameRecord::new("ab.la", "nc")]);
        assert_ne!(left.id, right.id);
    }

    #[test]
    fn empty_listing_digest_is_stable() {
        let listing = RecordListing::<CnameRecord>::canonicalize(Vec::new());
        assert!(listing.is_empty());
        assert_eq!(
            listing.id,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
