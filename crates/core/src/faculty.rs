//! Faculty account field rules.

/// Canonical stored form of an email address: trimmed and lowercased.
///
/// Uniqueness is checked against this form, so `Ada@Uni.edu` and
/// `ada@uni.edu ` name the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Canonical stored form of a free-text profile field (name, department).
pub fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}
