//! The canonical case fold.
//!
//! Both [`VocabularyIndexBuilder`](crate::VocabularyIndexBuilder) and
//! [`PrefixSearchEngine`](crate::PrefixSearchEngine) go through [`fold`]; the
//! index ordering is only valid while they agree, so nothing else may
//! normalize terms on its own.

/// Map a term to its comparison key: surrounding whitespace removed, then
/// Unicode lowercase (locale-independent).
pub fn fold(term: &str) -> String {
    term.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_lowercases_and_trims() {
        assert_eq!(fold("  Apple\t"), "apple");
        assert_eq!(fold("ORANGE2"), "orange2");
    }

    #[test]
    fn test_fold_handles_non_ascii() {
        assert_eq!(fold("École"), "école");
        assert_eq!(fold("ΣΟΦΊΑ"), "σοφία");
    }

    #[test]
    fn test_fold_is_idempotent() {
        for term in ["Apple", " Banana ", "Straße", "NEW_York", ""] {
            assert_eq!(fold(&fold(term)), fold(term));
        }
    }
}
