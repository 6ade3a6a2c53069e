//! Log sanitization utilities
//!
//! Keeps session ids and oversized response bodies out of debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Visible prefix length for masked secrets.
const MASK_VISIBLE: usize = 4;

/// Byte offset of the last char boundary at or before `limit`.
fn char_boundary_before(s: &str, limit: usize) -> usize {
    s.char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= limit)
        .last()
        .unwrap_or(0)
}

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned as-is; longer ones are cut on a char
/// boundary and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    format!(
        "{}... [truncated, total {} bytes]",
        &s[..char_boundary_before(s, TRUNCATE_LIMIT)],
        s.len()
    )
}

/// Masks a secret such as a session id, keeping a short prefix for correlation.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= MASK_VISIBLE * 2 {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(MASK_VISIBLE).collect();
    format!("{prefix}***")
}
