use accu_lookup::config::StoreSettings;
use accu_lookup::{DataApiStore, LookupError, LookupService};
use httpmock::prelude::*;
use serde_json::json;

fn settings(server: &MockServer) -> StoreSettings {
    StoreSettings {
        uri: Some(server.url("/app/data/v1")),
        api_key: Some("secret".to_string()),
        timeout_seconds: 5,
        ..StoreSettings::default()
    }
}

fn liver_document() -> serde_json::Value {
    json!({
        "organ": "Liver",
        "patterns": [
            {
                "pattern": "Liver Qi Stagnation",
                "symptoms": ["irritability", "bloating"],
                "treatment_points": ["LV3"]
            },
            {
                "pattern": "Liver Yang Rising",
                "symptoms": ["headache"],
                "treatment_points": ["GB20"]
            }
        ]
    })
}

#[tokio::test]
async fn test_exact_match_uses_find_one() {
    let server = MockServer::start();

    let find_one = server.mock(|when, then| {
        when.method(POST)
            .path("/app/data/v1/action/findOne")
            .header("apikey", "secret")
            .body_contains("\"^liver$\"")
            .body_contains("accupuncture_data");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({ "document": liver_document() }));
    });
    let aggregate = server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/aggregate");
        then.status(200).json_body(json!({ "documents": [] }));
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let result = service.lookup("liver").await.unwrap();

    assert!(result.is_exact());
    assert_eq!(result.entries()[0].patterns.len(), 2);
    find_one.assert();
    aggregate.assert_hits(0);
}

#[tokio::test]
async fn test_partial_match_uses_aggregation_pipeline() {
    let server = MockServer::start();

    let find_one = server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/findOne");
        then.status(200).json_body(json!({ "document": null }));
    });
    let aggregate = server.mock(|when, then| {
        when.method(POST)
            .path("/app/data/v1/action/aggregate")
            .body_contains("$unwind")
            .body_contains("\"bloat\"");
        then.status(200).json_body(json!({
            "documents": [{
                "organ": "Liver",
                "patterns": [{
                    "pattern": "Liver Qi Stagnation",
                    "symptoms": ["irritability", "bloating"],
                    "treatment_points": ["LV3"]
                }]
            }]
        }));
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let result = service.lookup("bloat").await.unwrap();

    assert!(!result.is_exact());
    assert_eq!(result.len(), 1);
    assert_eq!(result.entries()[0].patterns[0].pattern, "Liver Qi Stagnation");
    find_one.assert();
    aggregate.assert();
}

#[tokio::test]
async fn test_unfiltered_aggregate_result_is_reshaped() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/findOne");
        then.status(200).json_body(json!({ "document": null }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/aggregate");
        then.status(200).json_body(json!({ "documents": [liver_document()] }));
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let result = service.lookup("headache").await.unwrap();

    assert_eq!(result.entries()[0].patterns.len(), 1);
    assert_eq!(result.entries()[0].patterns[0].pattern, "Liver Yang Rising");
}

#[tokio::test]
async fn test_empty_aggregate_is_not_found() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/findOne");
        then.status(200).json_body(json!({ "document": null }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/aggregate");
        then.status(200).json_body(json!({ "documents": [] }));
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let err = service.lookup("xyz").await.unwrap_err();

    assert!(matches!(err, LookupError::NotFound { .. }));
}

#[tokio::test]
async fn test_exists_uses_count_pipelines() {
    let server = MockServer::start();

    let exact_count = server.mock(|when, then| {
        when.method(POST)
            .path("/app/data/v1/action/aggregate")
            .body_contains("$count")
            .body_contains("\"^tinnitus$\"");
        then.status(200).json_body(json!({ "documents": [] }));
    });
    let partial_count = server.mock(|when, then| {
        when.method(POST)
            .path("/app/data/v1/action/aggregate")
            .body_contains("$count")
            .body_contains("patterns.symptoms");
        then.status(200).json_body(json!({ "documents": [{ "matches": 1 }] }));
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let availability = service.check_availability("tinnitus").await.unwrap();

    assert_eq!(availability.detail, "Resource available");
    exact_count.assert();
    partial_count.assert();
}

#[tokio::test]
async fn test_store_error_status_is_internal() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/findOne");
        then.status(401).body("{\"error\":\"invalid session\"}");
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let err = service.lookup("liver").await.unwrap_err();

    assert!(matches!(err, LookupError::StoreError { .. }));
    assert!(err.is_internal());
    assert!(!err.user_friendly_message().contains("invalid session"));
}

#[tokio::test]
async fn test_malformed_document_is_internal() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/app/data/v1/action/findOne");
        then.status(200).json_body(json!({ "document": { "patterns": [] } }));
    });

    let service = LookupService::new(DataApiStore::new(&settings(&server)).unwrap());
    let err = service.lookup("liver").await.unwrap_err();

    assert!(matches!(err, LookupError::InvalidData { .. }));
}
