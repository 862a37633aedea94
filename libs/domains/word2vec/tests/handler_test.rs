//! Handler tests for the word2vec domain
//!
//! These drive `handlers::router` with `oneshot()` over a tiny in-memory
//! model and check:
//! - the bare-array shape of `/suggest`
//! - the success envelope (`success`, `taken`) on supervised routes
//! - best-effort masking of model failures
//! - the failure envelope for undecodable parameters

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_word2vec::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn app() -> axum::Router {
    let model = Word2Vec::from_parts(
        words(&["King", "queen", "man", "woman", "kingdom", "apple"]),
        vec![
            1.0, 1.0, 0.0, // King
            0.0, 1.0, 0.0, // queen
            1.0, 0.0, 0.0, // man
            -1.0, 0.2, 0.0, // woman
            0.9, 0.9, 0.1, // kingdom
            0.0, 0.0, 1.0, // apple
        ],
        3,
    )
    .unwrap();
    let index = VocabularyIndexBuilder::build(model.words()).unwrap();
    handlers::router(Word2VecService::new(index, Arc::new(model)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_success(body: &Value) {
    assert_eq!(body["success"], 1);
    assert!(body["taken"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_suggest_returns_bare_array() {
    let response = app().oneshot(get("/suggest?term=KIN&count=2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body, json!(["King", "kingdom"]));
}

#[tokio::test]
async fn test_suggest_defaults() {
    let response = app().oneshot(get("/suggest")).await.unwrap();

    let body = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!(["apple", "King", "kingdom", "man", "queen", "woman"])
    );
}

#[tokio::test]
async fn test_suggest_non_positive_count() {
    let response = app().oneshot(get("/suggest?term=k&count=0")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await, json!([]));
}

#[tokio::test]
async fn test_suggest_accepts_post() {
    let request = Request::builder()
        .method("POST")
        .uri("/suggest?term=q")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(json_body(response.into_body()).await, json!(["queen", "woman"]));
}

#[tokio::test]
async fn test_suggest_reads_form_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/suggest")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("term=kin&count=2"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response.into_body()).await,
        json!(["King", "kingdom"])
    );
}

#[tokio::test]
async fn test_suggest_reads_json_body() {
    let request = post_json("/suggest", json!({"term": "wo", "count": 1}));

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(json_body(response.into_body()).await, json!(["woman"]));
}

#[tokio::test]
async fn test_suggest_non_numeric_count_is_bad_request() {
    let response = app()
        .oneshot(get("/suggest?term=k&count=lots"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_most_similar_json_body() {
    let request = post_json(
        "/most_similar",
        json!({"positive": ["King", "woman"], "negative": ["man"]}),
    );

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_success(&body);
    let similars = body["similars"].as_array().unwrap();
    assert!(similars.len() <= SIMILAR_TOP_N);
    assert_eq!(similars[0][0], "queen");
    for pair in similars {
        let word = pair[0].as_str().unwrap();
        assert!(!["King", "woman", "man"].contains(&word));
    }
}

#[tokio::test]
async fn test_most_similar_query_string_with_brackets() {
    let response = app()
        .oneshot(get("/most_similar?positive%5B%5D=King"))
        .await
        .unwrap();

    let body = json_body(response.into_body()).await;
    assert_success(&body);
    assert_eq!(body["similars"][0][0], "kingdom");
}

#[tokio::test]
async fn test_most_similar_unknown_word_is_masked() {
    let request = post_json("/most_similar", json!({"positive": ["zzzzunknown"]}));

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_success(&body);
    assert_eq!(body["similars"], json!([]));
}

#[tokio::test]
async fn test_most_similar_invalid_parameter_is_failure_envelope() {
    let request = post_json("/most_similar", json!({"positive": 42}));

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], 0);
    assert!(body["error"].as_str().unwrap().contains("positive"));
    assert!(body.get("taken").is_none());
}

#[tokio::test]
async fn test_most_dissimilar_splits_words() {
    let request = post_json("/most_dissimilar", json!({"words": ["King queen", "man apple"]}));

    let response = app().oneshot(request).await.unwrap();

    let body = json_body(response.into_body()).await;
    assert_success(&body);
    assert_eq!(body["dissimilar"], "apple");
}

#[tokio::test]
async fn test_most_dissimilar_without_known_words() {
    let request = post_json("/most_dissimilar", json!({"words": "dragon unicorn"}));

    let response = app().oneshot(request).await.unwrap();

    let body = json_body(response.into_body()).await;
    assert_success(&body);
    assert_eq!(body["dissimilar"], "");
}

#[tokio::test]
async fn test_status_and_ping() {
    for uri in ["/status", "/ping"] {
        let response = app().oneshot(get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert_success(&body);
        assert_eq!(body["model"], "Word2Vec(vocab=6, size=3)");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/most_similar")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
