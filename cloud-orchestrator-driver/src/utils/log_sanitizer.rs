//! Log sanitization helpers
//!
//! Response bodies can carry VNC urls, instance passwords or long record
//! values, so debug logs only ever see a bounded prefix.

/// Maximum number of bytes kept in a logged body.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible `str::floor_char_boundary`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a body for logging, noting the original size when cut.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    format!(
        "{}... [truncated, total {} bytes]",
        &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
        s.len()
    )
}

/// Mask a credential for logging, keeping only the first four characters.
pub fn mask_secret(secret: &str) -> String {
    match secret.char_indices().nth(4) {
        Some((idx, _)) => format!("{}****", &secret[..idx]),
        None => "****".to_string(),
    }
}
