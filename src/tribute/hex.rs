//! Spaced uppercase hex rendering for the encoded tribute header.

use std::fmt::Write;

/// Render bytes as uppercase two-digit octets separated by single spaces.
///
/// `"Hi"` becomes `"48 49"`.
pub fn to_spaced_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", b);
    }
    out
}

/// Parse the output of [`to_spaced_hex`] back into bytes.
///
/// Returns `None` if any token is not a one or two digit hex octet.
pub fn from_spaced_hex(encoded: &str) -> Option<Vec<u8>> {
    encoded
        .split_ascii_whitespace()
        .map(|octet| {
            if octet.len() > 2 {
                return None;
            }
            u8::from_str_radix(octet, 16).ok()
        })
        .collect()
}
