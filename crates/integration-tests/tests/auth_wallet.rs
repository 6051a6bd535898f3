//! Integration tests for the wallet challenge-response login flow.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use datamart_integration_tests::{TestGateway, TestWallet};
use serde_json::json;

#[tokio::test]
async fn test_full_wallet_login_flow() {
    let gw = TestGateway::new();
    let wallet = TestWallet::new(0x42);

    let token = wallet.login(&gw).await;

    // The provisioned account works against protected routes
    let (status, _) = gw.get("/api/listings", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_repeat_logins_resolve_to_same_user() {
    let gw = TestGateway::new();
    let wallet = TestWallet::new(0x42);

    wallet.login(&gw).await;

    let (status, body) = gw
        .post(
            "/auth/wallet/nonce",
            None,
            &json!({ "walletAddress": wallet.address() }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let nonce = body["nonce"].as_str().unwrap().to_owned();

    let (status, body) = gw
        .post(
            "/auth/wallet/login",
            None,
            &json!({
                "walletAddress": wallet.address(),
                "nonce": nonce,
                "signature": wallet.sign_challenge(&nonce),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["walletAddress"], wallet.address());
}

#[tokio::test]
async fn test_nonce_cannot_be_replayed() {
    let gw = TestGateway::new();
    let wallet = TestWallet::new(0x42);

    let (_, body) = gw
        .post(
            "/auth/wallet/nonce",
            None,
            &json!({ "walletAddress": wallet.address() }),
        )
        .await;
    let nonce = body["nonce"].as_str().unwrap().to_owned();
    let login_body = json!({
        "walletAddress": wallet.address(),
        "nonce": nonce,
        "signature": wallet.sign_challenge(&nonce),
    });

    let (status, _) = gw.post("/auth/wallet/login", None, &login_body).await;
    assert_eq!(status, StatusCode::OK);

    // Same signed challenge again: the nonce is spent
    let (status, _) = gw.post("/auth/wallet/login", None, &login_body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_signature_burns_the_nonce() {
    let gw = TestGateway::new();
    let wallet = TestWallet::new(0x42);
    let intruder = TestWallet::new(0x43);

    let (_, body) = gw
        .post(
            "/auth/wallet/nonce",
            None,
            &json!({ "walletAddress": wallet.address() }),
        )
        .await;
    let nonce = body["nonce"].as_str().unwrap().to_owned();

    // Signed by the wrong key: rejected
    let (status, _) = gw
        .post(
            "/auth/wallet/login",
            None,
            &json!({
                "walletAddress": wallet.address(),
                "nonce": nonce,
                "signature": intruder.sign_challenge(&nonce),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The failed attempt consumed the challenge; even the right key cannot
    // use it now
    let (status, _) = gw
        .post(
            "/auth/wallet/login",
            None,
            &json!({
                "walletAddress": wallet.address(),
                "nonce": nonce,
                "signature": wallet.sign_challenge(&nonce),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fresh_nonce_invalidates_previous_one() {
    let gw = TestGateway::new();
    let wallet = TestWallet::new(0x42);
    let nonce_req = json!({ "walletAddress": wallet.address() });

    let (_, body) = gw.post("/auth/wallet/nonce", None, &nonce_req).await;
    let first = body["nonce"].as_str().unwrap().to_owned();
    let (_, body) = gw.post("/auth/wallet/nonce", None, &nonce_req).await;
    let second = body["nonce"].as_str().unwrap().to_owned();
    assert_ne!(first, second);

    let (status, _) = gw
        .post(
            "/auth/wallet/login",
            None,
            &json!({
                "walletAddress": wallet.address(),
                "nonce": first,
                "signature": wallet.sign_challenge(&first),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_wallet_address_rejected() {
    let gw = TestGateway::new();

    for bad in ["", "0x123", "ab5801a7d398351b8be11c439e05c5b3259aec9b", "0xZZ"] {
        let (status, _) = gw
            .post("/auth/wallet/nonce", None, &json!({ "walletAddress": bad }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {bad:?}");
    }
}

#[tokio::test]
async fn test_uppercase_address_normalizes() {
    let gw = TestGateway::new();
    let wallet = TestWallet::new(0x42);
    let upper = format!("0x{}", wallet.address()[2..].to_uppercase());

    let (status, body) = gw
        .post("/auth/wallet/nonce", None, &json!({ "walletAddress": upper }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let nonce = body["nonce"].as_str().unwrap().to_owned();

    // Mixed-case on login still resolves to the same stored challenge
    let (status, _) = gw
        .post(
            "/auth/wallet/login",
            None,
            &json!({
                "walletAddress": upper,
                "nonce": nonce,
                "signature": wallet.sign_challenge(&nonce),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
