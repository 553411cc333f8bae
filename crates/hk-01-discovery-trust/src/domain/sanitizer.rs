//! # Input Sanitizer
//!
//! Pure functions that clean or validate single fields of a discovery
//! record. Every value that reaches the application passes through here.
//!
//! ## Rules
//!
//! | Field | Max | Rejection behaviour |
//! |-------|-----|---------------------|
//! | Device name | 255 chars | never fails, placeholder when nothing survives |
//! | Host address | 255 chars | `None` |
//! | Attribute key | 255 chars | `false` |
//! | Attribute value | 1024 chars | never fails, may be empty |
//! | Binary attribute | 2048 bytes | `<binary:Nbytes>` placeholder |
//! | Attribute set | 50 entries | `false` |
//!
//! Blacklist matching is ASCII case-insensitive and repeats until no pattern
//! is left, so a removal that splices two halves into a new match is caught.

use super::entities::{AttributeMap, AttributeValue, SanitizedText};

/// Maximum device name length in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum host address length in characters.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Maximum attribute key length in characters.
pub const MAX_ATTRIBUTE_KEY_LENGTH: usize = 255;

/// Maximum attribute value length in characters.
pub const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 1024;

/// Maximum binary attribute length in bytes.
pub const MAX_BINARY_ATTRIBUTE_LENGTH: usize = 2048;

/// Maximum number of entries in one attribute set.
pub const MAX_ATTRIBUTE_COUNT: usize = 50;

/// Name substituted when nothing usable survives sanitization.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

/// Script, event-handler and template markers stripped from device names.
pub const NAME_BLACKLIST: &[&str] = &[
    "<script",
    "</script>",
    "javascript:",
    "vbscript:",
    "onerror=",
    "onload=",
    "onclick=",
    "onmouseover=",
    "{{",
    "}}",
    "${",
    "`",
];

/// SQL injection markers stripped from attribute values.
pub const SQL_INJECTION_PATTERNS: &[&str] = &[
    "';",
    "\";",
    "--",
    "/*",
    "*/",
    "xp_cmdshell",
    "drop table",
    "delete from",
    "insert into",
    "union select",
    " or 1=1",
];

/// Cross-site scripting markers stripped from attribute values.
pub const XSS_PATTERNS: &[&str] = &[
    "<script",
    "</script>",
    "javascript:",
    "vbscript:",
    "onerror=",
    "onload=",
    "onclick=",
    "<iframe",
    "<object",
    "<embed",
    "data:text/html",
];

/// Shell metacharacters stripped from attribute values.
pub const COMMAND_INJECTION_PATTERNS: &[&str] = &["&&", "||", "|", ";", "`", "$("];

// =============================================================================
// NAMES
// =============================================================================

/// Sanitize a device name. Never fails and never returns an empty string.
pub fn sanitize_name(raw: &str) -> SanitizedText {
    if raw.is_empty() {
        return SanitizedText::new(UNKNOWN_DEVICE_NAME.to_string());
    }

    let truncated = truncate_chars(raw, MAX_NAME_LENGTH);
    let visible: String = truncated
        .chars()
        .filter(|&c| (!c.is_control() || c.is_whitespace()) && !is_invisible_format_char(c))
        .collect();
    let cleaned = strip_patterns(&visible, &[NAME_BLACKLIST]);
    let trimmed = cleaned.trim();

    if trimmed.is_empty() {
        tracing::debug!(raw_len = raw.len(), "device name empty after sanitization");
        return SanitizedText::new(UNKNOWN_DEVICE_NAME.to_string());
    }
    if trimmed.len() != raw.len() {
        tracing::debug!(raw_len = raw.len(), clean_len = trimmed.len(), "device name altered");
    }

    SanitizedText::new(trimmed.to_string())
}

// =============================================================================
// ADDRESSES AND PORTS
// =============================================================================

/// Dotted-decimal IPv4 or eight-group colon-hex IPv6.
pub fn is_valid_address(text: &str) -> bool {
    is_dotted_ipv4(text) || is_full_ipv6(text)
}

fn is_dotted_ipv4(text: &str) -> bool {
    let octets: Vec<&str> = text.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().map_or(false, |value| value <= 255)
        })
}

fn is_full_ipv6(text: &str) -> bool {
    let groups: Vec<&str> = text.split(':').collect();
    groups.len() == 8
        && groups
            .iter()
            .all(|group| group.len() <= 4 && group.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// `0 < port <= 65535`.
pub fn is_valid_port(port: u32) -> bool {
    port > 0 && port <= u32::from(u16::MAX)
}

/// Return the address unchanged if it is well-formed, `None` otherwise.
///
/// Syntax only; no name resolution.
pub fn sanitize_address(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.chars().count() > MAX_ADDRESS_LENGTH {
        return None;
    }
    if !is_valid_address(raw) {
        tracing::debug!(len = raw.len(), "rejected malformed host address");
        return None;
    }
    Some(raw.to_string())
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// 1 to 255 characters of `[A-Za-z0-9_-]`, nothing else.
pub fn is_valid_attribute_key(key: &str) -> bool {
    (1..=MAX_ATTRIBUTE_KEY_LENGTH).contains(&key.len())
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Sanitize a textual attribute value. Never fails; the result may be empty.
pub fn sanitize_attribute_value(raw: &str) -> SanitizedText {
    let truncated = truncate_chars(raw, MAX_ATTRIBUTE_VALUE_LENGTH);
    let visible: String = truncated
        .chars()
        .filter(|&c| (!c.is_control() || c == '\n' || c == '\r') && !is_invisible_format_char(c))
        .collect();
    let cleaned = strip_patterns(
        &visible,
        &[SQL_INJECTION_PATTERNS, XSS_PATTERNS, COMMAND_INJECTION_PATTERNS],
    );

    SanitizedText::new(cleaned.trim().to_string())
}

/// Sanitize a binary attribute value.
///
/// Only the first 2048 bytes are considered. UTF-8 text (ASCII included) is
/// sanitized as a textual value; anything else becomes `<binary:Nbytes>`,
/// where N is the number of bytes considered.
pub fn sanitize_binary_attribute(bytes: &[u8]) -> SanitizedText {
    if bytes.len() > MAX_BINARY_ATTRIBUTE_LENGTH {
        return sanitize_binary_attribute(&bytes[..MAX_BINARY_ATTRIBUTE_LENGTH]);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => sanitize_attribute_value(text),
        Err(_) => SanitizedText::new(format!("<binary:{}bytes>", bytes.len())),
    }
}

/// Sanitize either kind of attribute value.
pub fn sanitize_attribute(value: &AttributeValue) -> SanitizedText {
    match value {
        AttributeValue::Text(text) => sanitize_attribute_value(text),
        AttributeValue::Binary(bytes) => sanitize_binary_attribute(bytes),
    }
}

/// Structural gate for a whole attribute set.
///
/// Rejects oversized sets, malformed keys and NUL bytes. Values that pass
/// still need `sanitize_attribute` before use.
pub fn validate_attribute_set(attributes: &AttributeMap) -> bool {
    if attributes.len() > MAX_ATTRIBUTE_COUNT {
        tracing::warn!(count = attributes.len(), max = MAX_ATTRIBUTE_COUNT, "attribute set too large");
        return false;
    }

    for (key, value) in attributes {
        if !is_valid_attribute_key(key) {
            tracing::warn!(key_len = key.len(), "invalid attribute key");
            return false;
        }
        if key.contains('\0') || value.contains_nul() {
            tracing::warn!(key = %key, "NUL byte in attribute");
            return false;
        }
    }

    true
}

// =============================================================================
// HELPERS
// =============================================================================

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Zero-width and bidirectional-override characters used for visual spoofing.
fn is_invisible_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}

/// Remove every pattern until none is left.
fn strip_patterns(text: &str, lists: &[&[&str]]) -> String {
    let mut current = text.to_string();
    loop {
        let before = current.len();
        for list in lists {
            for pattern in list.iter() {
                current = remove_ignore_ascii_case(&current, pattern);
            }
        }
        if current.len() == before {
            return current;
        }
    }
}

/// Remove all occurrences of an ASCII `pattern`, ignoring ASCII case.
///
/// `to_ascii_lowercase` keeps byte offsets intact and ASCII bytes never occur
/// inside a multi-byte UTF-8 sequence, so match offsets are char boundaries.
fn remove_ignore_ascii_case(haystack: &str, pattern: &str) -> String {
    let folded = haystack.to_ascii_lowercase();
    let needle = pattern.to_ascii_lowercase();
    if needle.is_empty() || !folded.contains(&needle) {
        return haystack.to_string();
    }

    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(offset) = folded[cursor..].find(&needle) {
        let start = cursor + offset;
        out.push_str(&haystack[cursor..start]);
        cursor = start + needle.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}
