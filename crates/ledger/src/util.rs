use unicode_normalization::UnicodeNormalization;

/// Normalizes a user-facing name for storage and case-insensitive
/// uniqueness checks (NFKC + trimmed).
#[must_use]
pub(crate) fn normalize_name(value: &str) -> String {
    value.trim().nfkc().collect()
}

/// Case-folded key used to compare names for duplicates.
#[must_use]
pub(crate) fn name_key(value: &str) -> String {
    normalize_name(value).to_lowercase()
}
