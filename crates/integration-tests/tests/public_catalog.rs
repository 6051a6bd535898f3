//! Integration tests for the public query and sample surfaces.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use datamart_integration_tests::TestGateway;
use serde_json::json;

async fn seed_seller(gw: &TestGateway, listings: u64) -> (String, String) {
    let (user, token) = gw.signup("seller@example.com", "longenough1").await;
    for i in 0..listings {
        let (status, _) = gw
            .post(
                "/api/listings",
                Some(&token),
                &json!({
                    "name": format!("listing {i}"),
                    "category": if i % 2 == 0 { "weather" } else { "finance" },
                    "rows": (0..5).map(|r| json!({ "row": r })).collect::<Vec<_>>(),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    (user["id"].as_str().unwrap().to_owned(), token)
}

#[tokio::test]
async fn test_query_is_public_and_paginates_without_duplicates() {
    let gw = TestGateway::new();
    let (seller, _) = seed_seller(&gw, 12).await;

    let mut seen = std::collections::HashSet::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(c) => format!("/sellers/{seller}/query?limit=5&cursor={c}"),
            None => format!("/sellers/{seller}/query?limit=5"),
        };
        let (status, body) = gw.get(&uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 12);

        for row in body["rows"].as_array().unwrap() {
            assert!(
                seen.insert(row["id"].as_str().unwrap().to_owned()),
                "duplicate listing across pages"
            );
        }
        if !body["hasMore"].as_bool().unwrap() {
            assert!(body.get("nextCursor").is_none());
            break;
        }
        cursor = Some(body["nextCursor"].as_str().unwrap().to_owned());
    }

    assert_eq!(seen.len(), 12);
}

#[tokio::test]
async fn test_query_category_filter() {
    let gw = TestGateway::new();
    let (seller, _) = seed_seller(&gw, 6).await;

    let (status, body) = gw
        .get(&format!("/sellers/{seller}/query?category=weather"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    for row in body["rows"].as_array().unwrap() {
        assert_eq!(row["category"], "weather");
    }
}

#[tokio::test]
async fn test_query_invalid_cursor_is_bad_request() {
    let gw = TestGateway::new();
    let (seller, _) = seed_seller(&gw, 1).await;

    let (status, _) = gw
        .get(&format!("/sellers/{seller}/query?cursor=!!garbage!!"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_query_unknown_seller_is_empty_not_an_error() {
    let gw = TestGateway::new();
    let nobody = uuid::Uuid::new_v4();

    let (status, body) = gw.get(&format!("/sellers/{nobody}/query"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["rows"], json!([]));
}

#[tokio::test]
async fn test_sample_returns_bounded_rows() {
    let gw = TestGateway::new();
    let (seller, token) = seed_seller(&gw, 0).await;

    let (_, listing) = gw
        .post(
            "/api/listings",
            Some(&token),
            &json!({
                "name": "big",
                "rows": (0..80).map(|r| json!({ "row": r })).collect::<Vec<_>>(),
            }),
        )
        .await;
    let id = listing["id"].as_str().unwrap();

    // Explicit limit
    let (status, body) = gw
        .get(&format!("/sellers/{seller}/listings/{id}/sample?limit=3"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 3);

    // Oversized limit is capped at 50
    let (_, body) = gw
        .get(
            &format!("/sellers/{seller}/listings/{id}/sample?limit=9999"),
            None,
        )
        .await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_sample_never_exceeds_stored_rows() {
    let gw = TestGateway::new();
    let (seller, token) = seed_seller(&gw, 0).await;

    let (_, listing) = gw
        .post(
            "/api/listings",
            Some(&token),
            &json!({
                "name": "small",
                "rows": [ { "row": 0 }, { "row": 1 } ],
            }),
        )
        .await;
    let id = listing["id"].as_str().unwrap();

    let (_, body) = gw
        .get(&format!("/sellers/{seller}/listings/{id}/sample?limit=50"), None)
        .await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deactivated_listing_vanishes_from_public_surfaces() {
    let gw = TestGateway::new();
    let (seller, token) = seed_seller(&gw, 1).await;

    let (_, body) = gw.get(&format!("/sellers/{seller}/query"), None).await;
    let id = body["rows"][0]["id"].as_str().unwrap().to_owned();

    gw.delete(&format!("/api/listings/{id}"), &token).await;

    let (_, body) = gw.get(&format!("/sellers/{seller}/query"), None).await;
    assert_eq!(body["total"], 0);

    let (status, _) = gw
        .get(&format!("/sellers/{seller}/listings/{id}/sample"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sample_does_not_leak_other_sellers_listings() {
    let gw = TestGateway::new();
    let (_, alice_token) = gw.signup("alice@example.com", "longenough1").await;
    let (bob, _) = gw.signup("bob@example.com", "longenough1").await;
    let bob_id = bob["id"].as_str().unwrap();

    let (_, listing) = gw
        .post(
            "/api/listings",
            Some(&alice_token),
            &json!({ "name": "alices", "rows": [ { "row": 0 } ] }),
        )
        .await;
    let id = listing["id"].as_str().unwrap();

    // Alice's listing requested through Bob's catalog: indistinguishable
    // from a missing listing
    let (status, body) = gw
        .get(&format!("/sellers/{bob_id}/listings/{id}/sample"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Listing not found");
}
