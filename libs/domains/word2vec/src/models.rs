use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for autocomplete
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct SuggestQuery {
    /// Prefix to complete; case and surrounding whitespace are ignored
    #[serde(default)]
    pub term: String,
    /// Maximum number of suggestions; zero or less returns nothing
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    10
}

impl Default for SuggestQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            count: default_count(),
        }
    }
}

/// Request body for `/most_similar` (form and query encodings work too)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MostSimilarRequest {
    /// Words pulling the result towards them; a single string is accepted
    #[serde(default)]
    pub positive: Vec<String>,
    /// Words pushing the result away; a single string is accepted
    #[serde(default)]
    pub negative: Vec<String>,
}

/// Request body for `/most_dissimilar`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MostDissimilarRequest {
    /// Candidate words; each item may hold several whitespace-separated words
    #[serde(default)]
    pub words: Vec<String>,
}

/// Nearest neighbours, best first. Empty when the query could not be answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimilarsResponse {
    /// `[word, cosine similarity]` pairs
    #[schema(value_type = Vec<Vec<Object>>)]
    pub similars: Vec<(String, f64)>,
}

/// The odd one out. Empty when the query could not be answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DissimilarResponse {
    pub dissimilar: String,
}

/// Description of the loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suggest_query_defaults() {
        let query: SuggestQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.term, "");
        assert_eq!(query.count, 10);
    }

    #[test]
    fn test_similars_serialize_as_pairs() {
        let response = SimilarsResponse {
            similars: vec![("queen".to_string(), 0.7)],
        };
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"similars": [["queen", 0.7]]})
        );
    }
}
