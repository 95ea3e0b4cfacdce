use common::{driver, matcher_with, store_body, MockStore, Reply, STORE_URL};
use locationmatcher::models::{DistanceKm, SearchQuery};
use locationmatcher::{AppError, CallError};
use serde_json::json;
use tokio_util::sync::CancellationToken;

mod common;

fn query(value: serde_json::Value) -> SearchQuery {
    serde_json::from_value(value).unwrap()
}

fn istanbul() -> SearchQuery {
    SearchQuery::new(28.974131, 41.025651, 0, 5000)
}

#[tokio::test]
async fn test_validation_errors_never_reach_the_store() {
    let store = MockStore::replying(store_body(vec![]));
    let matcher = matcher_with(store.clone(), 5);

    let invalid = [
        query(json!({
            "location": {"type": "Poin", "coordinates": [10.0, 10.0]},
            "minDistance": 0, "maxDistance": 121
        })),
        query(json!({
            "location": {"type": "Point", "coordinates": [10.0, 10.0, 10.0]},
            "minDistance": 0, "maxDistance": 121
        })),
        SearchQuery::new(191.1, 10.0, 0, 121),
        SearchQuery::new(10.0, 91.1, 0, 121),
        SearchQuery::new(10.0, 10.0, 102, 102),
    ];

    for q in &invalid {
        let result = matcher
            .find_nearest(&CancellationToken::new(), STORE_URL, q)
            .await;
        assert!(
            matches!(
                result,
                Err(AppError::Validation(_)) | Err(AppError::InvalidCoordinates)
            ),
            "expected a validation error for {:?}",
            q
        );
    }

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_forwards_validated_query_to_store() {
    let store = MockStore::replying(store_body(vec![]));
    let matcher = matcher_with(store.clone(), 5);

    let q = query(json!({
        "location": {"type": "Point", "coordinates": [28, 41]},
        "minDistance": 10, "maxDistance": 5000
    }));
    matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &q)
        .await
        .unwrap();

    assert_eq!(
        store.payloads(),
        vec![json!({
            "location": {"type": "Point", "coordinates": [28.0, 41.0]},
            "minDistance": 10,
            "maxDistance": 5000
        })]
    );
}

#[tokio::test]
async fn test_enriches_candidates_with_exact_distance() {
    let store = MockStore::replying(store_body(vec![
        driver("near", 28.979987, 41.008587, 1958.0),
        driver("far", 29.1, 41.1, 12_800.0),
    ]));
    let matcher = matcher_with(store, 5);

    let found = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, "near");
    assert!((found[0].distance.as_km() - 1.96).abs() < 0.01);
    assert_eq!(found[0].mongo_distance, Some(DistanceKm(1.958)));
    assert_eq!(found[0].location.lng(), 28.979987);
    assert_eq!(found[0].location.lat(), 41.008587);

    assert_eq!(found[1].id, "far");
    assert!(found[1].distance > found[0].distance);
    assert_eq!(found[1].mongo_distance, Some(DistanceKm(12.8)));
}

#[tokio::test]
async fn test_empty_store_result_is_not_an_error() {
    let store = MockStore::replying(store_body(vec![]));
    let matcher = matcher_with(store.clone(), 5);

    let found = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await
        .unwrap();
    assert!(found.is_empty());

    // the store's own "not found" envelope carries no data at all
    store.set_reply(Reply::Body(json!({"code": 404, "msg": "Not Found"})));
    let found = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_malformed_candidate_fails_whole_lookup() {
    let store = MockStore::replying(store_body(vec![
        driver("ok", 28.98, 41.01, 100.0),
        json!({
            "_id": "broken",
            "location": {"type": "Point", "coordinates": ["28.98", 41.01]}
        }),
    ]));
    let matcher = matcher_with(store, 5);

    let result = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await;
    assert!(matches!(result, Err(AppError::InvalidCoordinates)));
}

#[tokio::test]
async fn test_candidate_without_coordinates_is_never_zeroed() {
    let store = MockStore::replying(store_body(vec![json!({
        "_id": "nowhere",
        "location": {"type": "Point"}
    })]));
    let matcher = matcher_with(store, 5);

    let result = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await;
    assert!(matches!(result, Err(AppError::InvalidCoordinates)));
}

#[tokio::test]
async fn test_unreadable_store_body_is_transport_error() {
    let store = MockStore::new(Reply::Raw(b"<html>gateway</html>".to_vec()));
    let matcher = matcher_with(store, 5);

    let result = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await;
    assert!(matches!(result, Err(AppError::Transport(_))));

    // the call itself went through, so the breaker sees a success
    let (_, snapshot) = matcher.circuits().next().unwrap();
    assert_eq!(snapshot.consecutive_failures, 0);
}

#[tokio::test]
async fn test_transport_and_gate_errors_are_not_empty_results() {
    let store = MockStore::new(Reply::Fail(CallError::Status {
        status: 500,
        body: "boom".to_string(),
    }));
    let matcher = matcher_with(store.clone(), 1);

    let first = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await;
    assert!(matches!(first, Err(AppError::Transport(ref m)) if m.contains("HTTP 500")));

    let second = matcher
        .find_nearest(&CancellationToken::new(), STORE_URL, &istanbul())
        .await;
    assert!(matches!(second, Err(AppError::ServiceUnreachable)));
    assert_eq!(store.calls(), 1);

    let (_, snapshot) = matcher.circuits().next().unwrap();
    assert_eq!(snapshot.consecutive_failures, 1);
}

#[tokio::test]
async fn test_invalid_query_does_not_move_the_breaker() {
    let store = MockStore::failing();
    let matcher = matcher_with(store.clone(), 1);

    for _ in 0..3 {
        let result = matcher
            .find_nearest(
                &CancellationToken::new(),
                STORE_URL,
                &SearchQuery::new(0.0, 0.0, 10, 5),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    let (_, snapshot) = matcher.circuits().next().unwrap();
    assert_eq!(snapshot.consecutive_failures, 0);
}
