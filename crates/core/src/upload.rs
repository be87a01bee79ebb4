//! Upload naming rules and size limits.
//!
//! Stored names have the form `{unix_millis}-{suffix}-{sanitized_original}`.
//! The timestamp plus a random suffix below one billion keeps collisions
//! unlikely; the storage layer still refuses to overwrite an existing file.

use crate::error::CoreError;

/// Default maximum accepted file size (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Exclusive upper bound for the random stored-name suffix.
pub const SUFFIX_BOUND: u32 = 1_000_000_000;

/// Longest sanitized original name kept in a stored name.
const MAX_ORIGINAL_NAME_LEN: usize = 100;

/// Fallback when the client supplies no usable file name.
const DEFAULT_ORIGINAL_NAME: &str = "upload";

/// Public path prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Reject payloads larger than `limit` bytes.
pub fn check_size(len: usize, limit: usize) -> Result<(), CoreError> {
    if len > limit {
        return Err(CoreError::PayloadTooLarge(format!(
            "File exceeds the maximum allowed size of {limit} bytes"
        )));
    }
    Ok(())
}

/// Reduce a client-supplied file name to a safe single path segment.
///
/// Directory components are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`. Leading dots are stripped so the result is
/// never hidden or a relative path.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return DEFAULT_ORIGINAL_NAME.to_string();
    }

    // Keep the tail so the extension survives truncation.
    let skip = cleaned.len().saturating_sub(MAX_ORIGINAL_NAME_LEN);
    cleaned[skip..].to_string()
}

/// Build the stored file name from its parts.
///
/// # Examples
///
/// ```
/// use campusdocs_core::upload::stored_file_name;
///
/// assert_eq!(
///     stored_file_name(1_700_000_000_000, 42, "../Lecture 1.pdf"),
///     "1700000000000-42-Lecture_1.pdf"
/// );
/// ```
pub fn stored_file_name(unix_millis: i64, suffix: u32, original: &str) -> String {
    format!("{unix_millis}-{suffix}-{}", sanitize_file_name(original))
}

/// Public URL for a stored file, given the externally visible base URL.
pub fn public_url(base_url: &str, stored_name: &str) -> String {
    format!(
        "{}{PUBLIC_PREFIX}/{stored_name}",
        base_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn size_at_limit_is_accepted() {
        assert!(check_size(MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn size_over_limit_is_rejected() {
        let err = check_size(MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).unwrap_err();
        assert_matches!(err, CoreError::PayloadTooLarge(_));
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\notes.txt"), "notes.txt");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("Week 1 (draft).pdf"), "Week_1__draft_.pdf");
        assert_eq!(sanitize_file_name("résumé.doc"), "r_sum_.doc");
    }

    #[test]
    fn sanitize_never_returns_hidden_or_empty() {
        assert_eq!(sanitize_file_name(".env"), "env");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("dir/"), "upload");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[test]
    fn sanitize_truncates_keeping_extension() {
        let long = format!("{}.pdf", "a".repeat(300));
        let cleaned = sanitize_file_name(&long);
        assert_eq!(cleaned.len(), 100);
        assert!(cleaned.ends_with(".pdf"));
    }

    #[test]
    fn public_url_joins_without_double_slash() {
        assert_eq!(
            public_url("https://files.example.edu/", "1-2-a.pdf"),
            "https://files.example.edu/uploads/1-2-a.pdf"
        );
    }
}
