//! Digest rendering and range-response parsing for the k-anonymity protocol.
//!
//! Only the first [`PREFIX_LEN`] hex characters of the password's SHA-1
//! digest are ever transmitted; the remaining suffix stays local and is
//! compared against the response body line by line.

use sha1::{Digest, Sha1};

/// Hex lookup table for digest rendering.
const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Length of the transmitted digest prefix (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// Length of the locally retained digest suffix (35 hex characters).
pub const SUFFIX_LEN: usize = 40 - PREFIX_LEN;

/// SHA-1 digest of the password rendered as 40 uppercase hex characters.
pub(crate) fn digest_hex(password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    let digest: [u8; 20] = hasher.finalize().into();

    let mut hex = String::with_capacity(40);
    for byte in digest {
        hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
        hex.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    hex
}

/// Looks up `suffix` in a range response body and returns its breach count.
///
/// Each line is `SUFFIX:COUNT`. Blank lines are skipped and a line without
/// a colon is treated as a bare suffix. A matched record whose count does
/// not parse is reported as seen once.
pub(crate) fn suffix_count(body: &str, suffix: &str) -> Option<u64> {
    for line in body.lines() {
        if line.is_empty() {
            continue;
        }
        let (candidate, count) = match line.split_once(':') {
            Some((candidate, count)) => (candidate, count),
            None => (line, ""),
        };
        if candidate == suffix {
            return Some(count.trim().parse().unwrap_or(1));
        }
    }
    None
}
