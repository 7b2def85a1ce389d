//! Package reference sanitizing
//!
//! UPS rejects reference values containing punctuation such as `:` or
//! longer than 35 characters.

/// Maximum length of a package reference value
pub const REFERENCE_MAX_LEN: usize = 35;

/// Used when neither the caller's reference nor the sender name survives
/// sanitizing
pub const FALLBACK_REFERENCE: &str = "PRL";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '.' | '_' | '/')
}

/// Strip disallowed characters, collapse spaces and truncate
pub fn sanitize_reference(input: &str) -> String {
    let filtered: String = input.chars().filter(|c| is_allowed(*c)).collect();
    let collapsed = filtered.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(REFERENCE_MAX_LEN).collect();
    truncated.trim_end().to_string()
}

/// The reference tag every package carries
///
/// Caller text wins when it sanitizes to something; otherwise the sender's
/// name is used.
pub fn primary_reference(caller: Option<&str>, sender_name: &str) -> String {
    [caller.unwrap_or_default(), sender_name]
        .into_iter()
        .map(sanitize_reference)
        .find(|r| !r.is_empty())
        .unwrap_or_else(|| FALLBACK_REFERENCE.to_string())
}
