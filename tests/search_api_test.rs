use accu_lookup::config::ExactMatchShape;
use accu_lookup::core::query::ValidatedQuery;
use accu_lookup::domain::model::ReferenceEntry;
use accu_lookup::domain::ports::ReferenceStore;
use accu_lookup::{server, InMemoryStore, LookupError, LookupService};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const SAMPLE_DATA: &str = include_str!("../data/sample_reference.json");

fn app_with_shape(shape: ExactMatchShape) -> Router {
    let store = InMemoryStore::from_json_str(SAMPLE_DATA).unwrap();
    server::router(Arc::new(LookupService::new(store)), shape)
}

fn app() -> Router {
    app_with_shape(ExactMatchShape::List)
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

struct UnreachableStore;

#[async_trait]
impl ReferenceStore for UnreachableStore {
    async fn find_exact(&self, _query: &ValidatedQuery) -> accu_lookup::Result<Option<ReferenceEntry>> {
        Err(LookupError::StoreError {
            message: "findOne returned 503 Service Unavailable".to_string(),
        })
    }

    async fn find_partial(
        &self,
        _query: &ValidatedQuery,
        _limit: usize,
    ) -> accu_lookup::Result<Vec<ReferenceEntry>> {
        Ok(vec![])
    }

    async fn count_exact(&self, _query: &ValidatedQuery, _limit: usize) -> accu_lookup::Result<u64> {
        Err(LookupError::StoreError {
            message: "aggregate returned 503 Service Unavailable".to_string(),
        })
    }

    async fn count_partial(&self, _query: &ValidatedQuery, _limit: usize) -> accu_lookup::Result<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_exact_organ_returns_full_document() {
    let (status, body) = send(app(), Method::GET, "/search?query=LIVER").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["organ"], "Liver");
    assert_eq!(entries[0]["patterns"].as_array().unwrap().len(), 3);
    assert_eq!(entries[0]["patterns"][0]["treatment_points"][0], "LV3");
    assert!(entries[0].get("_id").is_none());
}

#[tokio::test]
async fn test_exact_organ_wins_over_symptom_text() {
    // "heart" 也出現在 Stomach 的 heartburn 中
    let (status, body) = send(app(), Method::GET, "/search?query=heart").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["organ"], "Heart");
    assert_eq!(entries[0]["patterns"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_exact_organ_with_empty_patterns() {
    let (status, body) = send(app(), Method::GET, "/search?query=triple%20burner").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["organ"], "Triple Burner");
    assert_eq!(body[0]["patterns"], serde_json::json!([]));
}

#[tokio::test]
async fn test_symptom_search_returns_reshaped_entries() {
    let (status, body) = send(app(), Method::GET, "/search?query=bloat").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["organ"], "Liver");
    assert_eq!(entries[0]["patterns"].as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["patterns"][0]["pattern"], "Liver Qi Stagnation");

    assert_eq!(entries[1]["organ"], "Spleen");
    assert_eq!(entries[1]["patterns"].as_array().unwrap().len(), 1);
    assert_eq!(entries[1]["patterns"][0]["pattern"], "Spleen Qi Deficiency");

    for entry in entries {
        assert!(entry.get("_id").is_none());
    }
}

#[tokio::test]
async fn test_pattern_name_search_with_spaces() {
    let (status, body) = send(app(), Method::GET, "/search?query=yang%20deficiency").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["organ"], "Kidney");
    assert_eq!(entries[0]["patterns"][0]["pattern"], "Kidney Yang Deficiency");
}

#[tokio::test]
async fn test_no_match_is_404() {
    let (status, body) = send(app(), Method::GET, "/search?query=xyz").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No matching data found.");
}

#[tokio::test]
async fn test_invalid_characters_are_400() {
    for uri in [
        "/search?query=liver%21",
        "/search?query=%5Eliver",
        "/search?query=li.%2A",
    ] {
        let (status, body) = send(app(), Method::GET, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body["detail"], "Invalid search term.");
    }
}

#[tokio::test]
async fn test_short_or_missing_query_is_422() {
    let (status, _) = send(app(), Method::GET, "/search?query=l").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(app(), Method::GET, "/search").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Query parameter 'query' is required");
}

#[tokio::test]
async fn test_head_search_reports_availability() {
    let (status, _) = send(app(), Method::HEAD, "/search?query=tinnitus").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(), Method::HEAD, "/search?query=kidney").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(), Method::HEAD, "/search?query=xyz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(), Method::HEAD, "/search?query=kidney%3B").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_exact_match_as_object() {
    let app = app_with_shape(ExactMatchShape::Object);

    let (status, body) = send(app.clone(), Method::GET, "/search?query=spleen").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object());
    assert_eq!(body["organ"], "Spleen");

    // 部分比對仍然是陣列
    let (status, body) = send(app, Method::GET, "/search?query=nausea").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let app = server::router(
        Arc::new(LookupService::new(UnreachableStore)),
        ExactMatchShape::List,
    );

    let (status, body) = send(app.clone(), Method::GET, "/search?query=liver").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Internal server error:"));

    let (status, _) = send(app.clone(), Method::HEAD, "/search?query=liver").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // health 不依賴 store
    let (status, _) = send(app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
}
