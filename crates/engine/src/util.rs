use unicode_normalization::UnicodeNormalization;

/// Canonical key for uniqueness checks: NFKC, lowercased, whitespace
/// collapsed.
pub(crate) fn normalize_key(value: &str) -> String {
    let normalized: String = value.nfkc().collect();
    normalized
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_case_and_whitespace() {
        assert_eq!(normalize_key("  Market   Alışverişi "), "market alışverişi");
    }
}
