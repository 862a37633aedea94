//! Sorted, case-folded view of the model vocabulary.
//!
//! The index holds two parallel sequences of equal length: the folded keys in
//! non-decreasing order, and the original spelling of the term that produced
//! each key. Prefix search binary-searches the first and returns slices of the
//! second.

use crate::error::IndexBuildError;
use crate::fold::fold;
use std::path::Path;
use tracing::info;

/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyIndex {
    folded_sorted: Vec<String>,
    original_at_position: Vec<String>,
}

impl VocabularyIndex {
    pub fn len(&self) -> usize {
        self.folded_sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folded_sorted.is_empty()
    }

    /// Folded keys in non-decreasing order.
    pub fn folded(&self) -> &[String] {
        &self.folded_sorted
    }

    /// Original spellings, aligned with [`folded`](Self::folded).
    pub fn originals(&self) -> &[String] {
        &self.original_at_position
    }

    /// Leftmost position whose key is `>= folded_prefix`.
    pub fn lower_bound(&self, folded_prefix: &str) -> usize {
        self.folded_sorted
            .partition_point(|key| key.as_str() < folded_prefix)
    }

    /// Up to `limit` original spellings starting at `start`.
    pub fn originals_from(&self, start: usize, limit: usize) -> &[String] {
        let len = self.original_at_position.len();
        let start = start.min(len);
        let end = start.saturating_add(limit).min(len);
        &self.original_at_position[start..end]
    }
}

/// One-shot construction of a [`VocabularyIndex`].
pub struct VocabularyIndexBuilder;

impl VocabularyIndexBuilder {
    /// Build the index from raw vocabulary terms in model order.
    ///
    /// Terms are decoded as UTF-8, folded and stably sorted by folded key, so
    /// terms with equal keys keep their relative input order. Duplicates are
    /// kept.
    ///
    /// # Errors
    /// Returns [`IndexBuildError::Decode`] for the first term that is not
    /// valid UTF-8.
    pub fn build<I>(raw: I) -> Result<VocabularyIndex, IndexBuildError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut originals = raw
            .into_iter()
            .enumerate()
            .map(|(position, term)| {
                std::str::from_utf8(term.as_ref())
                    .map(str::to_owned)
                    .map_err(|source| IndexBuildError::Decode { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut keyed: Vec<(String, usize)> = originals
            .iter()
            .enumerate()
            .map(|(position, term)| (fold(term), position))
            .collect();
        // `sort_by` is stable
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut folded_sorted = Vec::with_capacity(keyed.len());
        let mut original_at_position = Vec::with_capacity(keyed.len());
        for (key, position) in keyed {
            folded_sorted.push(key);
            // every position appears exactly once in `keyed`
            original_at_position.push(std::mem::take(&mut originals[position]));
        }

        info!(terms = folded_sorted.len(), "Built vocabulary index");
        Ok(VocabularyIndex {
            folded_sorted,
            original_at_position,
        })
    }

    /// Build the index from a newline-delimited vocabulary file.
    ///
    /// Blank lines are skipped and a trailing `\r` is dropped.
    pub fn from_path(path: impl AsRef<Path>) -> Result<VocabularyIndex, IndexBuildError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| IndexBuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let lines = raw
            .split(|byte| *byte == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.trim_ascii().is_empty());

        Self::build(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build(terms: &[&str]) -> VocabularyIndex {
        VocabularyIndexBuilder::build(terms).unwrap()
    }

    #[test]
    fn test_build_sorts_by_folded_key() {
        let index = build(&["banana", "Apple", "apricot", "APPLE"]);

        assert_eq!(index.folded(), ["apple", "apple", "apricot", "banana"]);
        assert_eq!(index.originals(), ["Apple", "APPLE", "apricot", "banana"]);
    }

    #[test]
    fn test_folded_keys_match_originals() {
        let index = build(&["Zeta", " alpha ", "Beta", "gamma"]);

        assert_eq!(index.len(), 4);
        for (key, original) in index.folded().iter().zip(index.originals()) {
            assert_eq!(key, &fold(original));
        }
        assert!(index.folded().windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let index = build(&["KING", "king", "King"]);
        assert_eq!(index.originals(), ["KING", "king", "King"]);
    }

    #[test]
    fn test_lower_bound_and_window() {
        let index = build(&["queen", "King", "kingdom", "knight", "apple"]);

        assert_eq!(index.folded(), ["apple", "king", "kingdom", "knight", "queen"]);
        assert_eq!(index.lower_bound("kin"), 1);
        assert_eq!(index.originals_from(1, 2), ["King", "kingdom"]);
        assert_eq!(index.lower_bound("zzz"), 5);
        assert!(index.originals_from(5, 10).is_empty());
        assert_eq!(index.originals_from(3, usize::MAX), ["knight", "queen"]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let index = VocabularyIndexBuilder::build(Vec::<String>::new()).unwrap();

        assert!(index.is_empty());
        assert_eq!(index.lower_bound("a"), 0);
        assert!(index.originals_from(0, 10).is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_reported_with_position() {
        let raw: Vec<Vec<u8>> = vec![b"ok".to_vec(), vec![0xff, 0xfe]];

        let err = VocabularyIndexBuilder::build(raw).unwrap_err();
        assert!(matches!(err, IndexBuildError::Decode { position: 1, .. }));
    }

    #[test]
    fn test_from_path_reads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Paris\r\nberlin\n\n  \nAmsterdam\n").unwrap();

        let index = VocabularyIndexBuilder::from_path(file.path()).unwrap();
        assert_eq!(index.originals(), ["Amsterdam", "berlin", "Paris"]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = VocabularyIndexBuilder::from_path("/nonexistent/vocab.txt").unwrap_err();
        assert!(matches!(err, IndexBuildError::Io { .. }));
    }
}
