//! Request path canonicalization.
//!
//! The gate classifies and forwards the same canonical path, so a path the
//! upstream would resolve differently (`/x/../admin`, `/x/%2e%2e/admin`,
//! `//home`) can never slip past the allow-list as a public path.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("request path must start with '/'")]
    NotAbsolute,
    #[error("encoded path separators are not accepted")]
    EncodedSeparator,
    #[error("backslashes are not accepted in request paths")]
    Backslash,
}

/// Canonical form of a request path (no query string).
///
/// Percent-encoded unreserved characters are decoded, empty and `.`
/// segments are dropped, and `..` removes the previous segment (never
/// climbing above the root). Other percent-encodings are kept as sent.
/// A trailing slash is preserved, so an already canonical path comes back
/// unchanged.
pub fn normalize_path(raw: &str) -> Result<String, PathError> {
    if !raw.starts_with('/') {
        return Err(PathError::NotAbsolute);
    }
    if raw.contains('\\') {
        return Err(PathError::Backslash);
    }

    let mut segments: Vec<String> = Vec::new();
    for segment in raw.split('/') {
        let segment = decode_unreserved(segment)?;
        match segment.as_str() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut path = format!("/{}", segments.join("/"));
    let trailing = raw.ends_with('/') || raw.ends_with("/.") || raw.ends_with("/..");
    if trailing && path != "/" {
        path.push('/');
    }
    Ok(path)
}

fn decode_unreserved(segment: &str) -> Result<String, PathError> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(decoded) = hex_pair(bytes[i + 1], bytes[i + 2]) {
                match decoded {
                    b'/' | b'\\' => return Err(PathError::EncodedSeparator),
                    c if is_unreserved(c) => out.push(c),
                    // Reserved and non-ASCII escapes stay as sent
                    _ => out.extend_from_slice(&bytes[i..i + 3]),
                }
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

fn is_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_' | b'~')
}
