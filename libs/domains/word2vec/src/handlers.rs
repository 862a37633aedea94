//! HTTP handlers for the word2vec API.
//!
//! `/suggest` answers with a bare JSON array. The semantic routes are wrapped
//! by [`supervise`] and answer with the handler's JSON object plus `success`
//! and `taken`, or `{"error": ..., "success": 0}` with status 500.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{AppError, Params, RequestParams, supervise};
use serde_json::Value;
use utoipa::OpenApi;

use crate::error::{W2vError, W2vResult};
use crate::models::{
    DissimilarResponse, MostDissimilarRequest, MostSimilarRequest, SimilarsResponse,
    StatusResponse, SuggestQuery,
};
use crate::service::Word2VecService;

/// OpenAPI documentation for the word2vec API
#[derive(OpenApi)]
#[openapi(
    paths(suggest, most_similar, most_dissimilar, status),
    components(
        schemas(
            SuggestQuery,
            MostSimilarRequest, SimilarsResponse,
            MostDissimilarRequest, DissimilarResponse,
            StatusResponse
        )
    ),
    tags(
        (name = "word2vec", description = "Autocomplete and word-vector queries")
    )
)]
pub struct ApiDoc;

/// Create the word2vec router. Routes are mounted at the root.
pub fn router(service: Word2VecService) -> Router {
    let service = Arc::new(service);

    Router::new()
        .route("/suggest", get(suggest).post(suggest))
        .route(
            "/most_similar",
            supervise("most_similar", bind(&service, most_similar)).into_method_router(),
        )
        .route(
            "/most_dissimilar",
            supervise("most_dissimilar", bind(&service, most_dissimilar)).into_method_router(),
        )
        .route(
            "/status",
            supervise("status", bind(&service, status)).into_method_router(),
        )
        .route(
            "/ping",
            supervise("ping", bind(&service, status)).into_method_router(),
        )
        .with_state(service)
}

/// Close a `(service, params)` handler over the shared service.
fn bind<F, Fut>(
    service: &Arc<Word2VecService>,
    handler: F,
) -> impl Fn(Params) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<Word2VecService>, Params) -> Fut + Send + Sync + 'static,
{
    let service = Arc::clone(service);
    move |params| handler(Arc::clone(&service), params)
}

/// Autocomplete a prefix from the model vocabulary
///
/// `term` and `count` may come from the query string, a form body or a JSON body.
#[utoipa::path(
    get,
    path = "/suggest",
    tag = "word2vec",
    params(SuggestQuery),
    responses(
        (status = 200, description = "Vocabulary words at or after the prefix in sort order", body = Vec<String>),
        (status = 400, description = "Malformed body or non-numeric count")
    )
)]
async fn suggest(
    State(service): State<Arc<Word2VecService>>,
    RequestParams(params): RequestParams,
) -> Result<Json<Vec<String>>, AppError> {
    let query = suggest_query(&params)?;
    Ok(Json(service.suggest(&query.term, query.count)))
}

/// Read `term` and `count`; query and form values arrive as strings.
fn suggest_query(params: &Params) -> Result<SuggestQuery, AppError> {
    let mut query = SuggestQuery::default();

    match params.get("term") {
        None | Some(Value::Null) => {}
        Some(Value::String(term)) => query.term = term.clone(),
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "'term' must be a string, got {other}"
            )));
        }
    }

    match params.get("count") {
        None | Some(Value::Null) => {}
        Some(Value::String(raw)) => {
            query.count = raw.trim().parse().map_err(|_| {
                AppError::BadRequest(format!("'count' must be an integer, got '{raw}'"))
            })?;
        }
        Some(Value::Number(n)) => {
            query.count = n.as_i64().ok_or_else(|| {
                AppError::BadRequest(format!("'count' must be an integer, got {n}"))
            })?;
        }
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "'count' must be an integer, got {other}"
            )));
        }
    }

    Ok(query)
}

/// Words closest to `positive - negative`
///
/// Unknown words or an empty query yield an empty list, not an error.
#[utoipa::path(
    post,
    path = "/most_similar",
    tag = "word2vec",
    request_body = MostSimilarRequest,
    responses(
        (status = 200, description = "Up to five neighbours, plus success and taken", body = SimilarsResponse),
        (status = 500, description = "Parameters could not be decoded")
    )
)]
async fn most_similar(
    service: Arc<Word2VecService>,
    params: Params,
) -> W2vResult<SimilarsResponse> {
    let positive = term_list(&params, "positive")?;
    let negative = term_list(&params, "negative")?;
    Ok(service.most_similar(positive, negative).await)
}

/// The word that fits least with the others
///
/// Unknown words are ignored; if none are left the answer is an empty string.
#[utoipa::path(
    post,
    path = "/most_dissimilar",
    tag = "word2vec",
    request_body = MostDissimilarRequest,
    responses(
        (status = 200, description = "The odd word out, plus success and taken", body = DissimilarResponse),
        (status = 500, description = "Parameters could not be decoded")
    )
)]
async fn most_dissimilar(
    service: Arc<Word2VecService>,
    params: Params,
) -> W2vResult<DissimilarResponse> {
    let words = word_list(&params, "words")?;
    Ok(service.most_dissimilar(words).await)
}

/// Describe the loaded model (also served at `/ping`)
#[utoipa::path(
    get,
    path = "/status",
    tag = "word2vec",
    responses(
        (status = 200, description = "Model description, plus success and taken", body = StatusResponse)
    )
)]
async fn status(service: Arc<Word2VecService>, _params: Params) -> W2vResult<StatusResponse> {
    Ok(service.status())
}

/// A string or an array of strings under `key`; absent means empty.
fn term_list(params: &Params, key: &str) -> W2vResult<Vec<String>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(term)) => Ok(vec![term.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(term) => Ok(term.clone()),
                other => Err(W2vError::Validation(format!(
                    "'{key}' must contain only strings, got {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(W2vError::Validation(format!(
            "'{key}' must be a string or an array of strings, got {other}"
        ))),
    }
}

/// Like [`term_list`], with every item split on whitespace.
fn word_list(params: &Params, key: &str) -> W2vResult<Vec<String>> {
    Ok(term_list(params, key)?
        .iter()
        .flat_map(|item| item.split_whitespace())
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_term_list_accepts_string_or_array() {
        let p = params(json!({"positive": "king", "negative": ["man", "boy"]}));

        assert_eq!(term_list(&p, "positive").unwrap(), ["king"]);
        assert_eq!(term_list(&p, "negative").unwrap(), ["man", "boy"]);
        assert!(term_list(&p, "missing").unwrap().is_empty());
    }

    #[test]
    fn test_term_list_rejects_other_types() {
        let p = params(json!({"positive": 3, "negative": ["man", 1]}));

        assert!(matches!(
            term_list(&p, "positive"),
            Err(W2vError::Validation(_))
        ));
        assert!(matches!(
            term_list(&p, "negative"),
            Err(W2vError::Validation(_))
        ));
    }

    #[test]
    fn test_word_list_splits_items() {
        let p = params(json!({"words": ["breakfast cereal", " dinner\tlunch "]}));

        assert_eq!(
            word_list(&p, "words").unwrap(),
            ["breakfast", "cereal", "dinner", "lunch"]
        );
    }

    #[test]
    fn test_suggest_query_reads_strings_and_numbers() {
        let from_form = suggest_query(&params(json!({"term": "or", "count": " 2 "}))).unwrap();
        assert_eq!(from_form.term, "or");
        assert_eq!(from_form.count, 2);

        let from_json = suggest_query(&params(json!({"count": -1}))).unwrap();
        assert_eq!(from_json.term, "");
        assert_eq!(from_json.count, -1);

        assert_eq!(suggest_query(&Params::new()).unwrap().count, 10);
    }

    #[test]
    fn test_suggest_query_rejects_bad_count() {
        for bad in [json!({"count": "ten"}), json!({"count": 2.5}), json!({"term": ["a"]})] {
            assert!(matches!(
                suggest_query(&params(bad)),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/suggest", "/most_similar", "/most_dissimilar", "/status"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
