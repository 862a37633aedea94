use crate::fold::fold;
use crate::index::VocabularyIndex;

/// Ordered-vocabulary autocomplete.
///
/// The result is the window of the sorted vocabulary starting at the first
/// key `>= fold(prefix)`. Terms are not filtered by prefix containment: when
/// fewer than `limit` keys share the prefix, the window continues with the
/// next terms in sort order.
pub struct PrefixSearchEngine;

impl PrefixSearchEngine {
    /// Return at most `limit` original spellings, nearest-after-prefix first.
    ///
    /// A `limit` of zero or less yields an empty result.
    pub fn suggest(index: &VocabularyIndex, prefix: &str, limit: i64) -> Vec<String> {
        if limit <= 0 {
            return Vec::new();
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let start = index.lower_bound(&fold(prefix));
        index.originals_from(start, limit).to_vec()
    }
}
