use crate::error::ModelResult;

/// Read-only semantic queries over a word-embedding model.
///
/// Implementations are CPU-bound and synchronous; async callers should run
/// them on a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait SemanticModel: Send + Sync {
    /// The `top_n` words closest to `positive - negative`, best first, with
    /// their cosine similarity. Input words are never part of the result.
    fn most_similar(
        &self,
        positive: &[String],
        negative: &[String],
        top_n: usize,
    ) -> ModelResult<Vec<(String, f64)>>;

    /// The word in `words` least similar to the others.
    fn does_not_match(&self, words: &[String]) -> ModelResult<String>;

    /// Short human-readable description of the loaded model.
    fn describe(&self) -> String;
}
