use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ModelError, ModelResult};
use crate::fold::fold;
use crate::index::VocabularyIndex;
use crate::model::SemanticModel;
use crate::models::{DissimilarResponse, SimilarsResponse, StatusResponse};
use crate::suggest::PrefixSearchEngine;

/// Number of neighbours returned by [`Word2VecService::most_similar`].
pub const SIMILAR_TOP_N: usize = 5;

/// Word2Vec service: autocomplete plus best-effort semantic queries.
///
/// Semantic queries never fail. Whatever goes wrong inside the model (unknown
/// words, empty input, a panicking worker) is logged and answered with an
/// empty result.
#[derive(Clone)]
pub struct Word2VecService {
    index: Arc<VocabularyIndex>,
    model: Arc<dyn SemanticModel>,
}

impl Word2VecService {
    pub fn new(index: VocabularyIndex, model: Arc<dyn SemanticModel>) -> Self {
        Self {
            index: Arc::new(index),
            model,
        }
    }

    /// Autocomplete `term` with up to `count` vocabulary words.
    pub fn suggest(&self, term: &str, count: i64) -> Vec<String> {
        let suggestions = PrefixSearchEngine::suggest(&self.index, term, count);
        info!("suggested {:?}: {:?}", fold(term), suggestions);
        suggestions
    }

    /// The [`SIMILAR_TOP_N`] words closest to `positive - negative`.
    pub async fn most_similar(
        &self,
        positive: Vec<String>,
        negative: Vec<String>,
    ) -> SimilarsResponse {
        let positive = clean_terms(positive);
        let negative = clean_terms(negative);

        let model = Arc::clone(&self.model);
        let (pos, neg) = (positive.clone(), negative.clone());
        let result = run_blocking(move || model.most_similar(&pos, &neg, SIMILAR_TOP_N)).await;

        let similars = best_effort("most_similar", result);
        info!("similars for {:?} vs. {:?}: {:?}", positive, negative, similars);
        SimilarsResponse { similars }
    }

    /// The word in `words` that fits least with the others.
    pub async fn most_dissimilar(&self, words: Vec<String>) -> DissimilarResponse {
        let words = clean_terms(words);

        let model = Arc::clone(&self.model);
        let query = words.clone();
        let result = run_blocking(move || model.does_not_match(&query)).await;

        let dissimilar = best_effort("most_dissimilar", result);
        info!("dissimilar for {:?}: {:?}", words, dissimilar);
        DissimilarResponse { dissimilar }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            model: self.model.describe(),
        }
    }
}

/// Trim every term and drop the ones left empty.
fn clean_terms(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Run a model query on the blocking pool.
async fn run_blocking<T, F>(query: F) -> ModelResult<T>
where
    F: FnOnce() -> ModelResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(query)
        .await
        .map_err(|e| ModelError::Internal(format!("model worker failed: {e}")))?
}

/// Degrade a failed semantic query to the neutral value of its result type.
fn best_effort<T: Default>(operation: &'static str, result: ModelResult<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(operation, error = %e, "Model query failed, answering with an empty result");
        T::default()
    })
}
