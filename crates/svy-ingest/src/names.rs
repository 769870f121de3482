//! Output variable-name sanitization.
//!
//! The target format accepts ASCII letters, digits, and underscores, a
//! non-digit first character, and at most 32 characters. This is a pure
//! string rewrite; semantic naming decisions stay with the survey host.

/// Maximum variable-name length the target format accepts.
pub const MAX_NAME_LEN: usize = 32;

/// Rewrite one raw field key into a legal variable name.
pub fn sanitize_var_name(raw: &str) -> String {
    let mut name: String = raw
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit()) {
        name.insert(0, 'v');
    }
    name.truncate(MAX_NAME_LEN);
    name
}

/// Sanitize a whole header row, suffixing duplicates so every output name
/// is unique. Order is preserved.
pub fn unique_var_names(headers: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let base = sanitize_var_name(header);
        let mut candidate = base.clone();
        let mut attempt = 2usize;
        while seen.contains(&candidate) {
            let suffix = format!("_{attempt}");
            let mut stem = base.clone();
            stem.truncate(MAX_NAME_LEN.saturating_sub(suffix.len()));
            candidate = format!("{stem}{suffix}");
            attempt += 1;
        }
        seen.push(candidate);
    }
    seen
}
