//! Integration test harness for the Datamart gateway.
//!
//! Tests run the full router in-process: no sockets, no external services.
//! The in-memory stores give every [`TestGateway`] an isolated world.
//!
//! # Example
//!
//! ```rust,ignore
//! let gw = TestGateway::new();
//! let (status, body) = gw
//!     .post("/auth/signup", None, &json!({"email": "a@x.com", "password": "longenough1"}))
//!     .await;
//! assert_eq!(status, StatusCode::CREATED);
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt as _;
use k256::ecdsa::SigningKey;
use secrecy::SecretString;
use serde_json::Value;
use sha3::{Digest, Keccak256};
use tower::ServiceExt as _;

use datamart_gateway::config::GatewayConfig;
use datamart_gateway::routes;
use datamart_gateway::services::signature::challenge_message;
use datamart_gateway::state::AppState;

/// Gateway configuration for tests: in-memory everything, no Sentry.
#[must_use]
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        token_secret: SecretString::from("qN3vZ8kXw1pL5rT9bYhJ2mFcAd7eGu4s".to_owned()),
        token_ttl: chrono::Duration::hours(1),
        nonce_ttl: chrono::Duration::seconds(300),
        store_timeout: Duration::from_secs(2),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// An in-process gateway with isolated in-memory stores.
pub struct TestGateway {
    router: Router,
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGateway {
    /// Build a gateway without rate limiting (the default for tests).
    ///
    /// # Panics
    ///
    /// Panics if application state fails to initialize.
    #[must_use]
    pub fn new() -> Self {
        let state = AppState::new(test_config()).expect("test state initializes");
        Self {
            router: routes::routes().with_state(state),
        }
    }

    /// Build a gateway with the production rate limiters applied.
    ///
    /// Requests must carry a proxy header (e.g. `x-forwarded-for`) for the
    /// limiter to key on.
    ///
    /// # Panics
    ///
    /// Panics if application state fails to initialize.
    #[must_use]
    pub fn rate_limited() -> Self {
        let state = AppState::new(test_config()).expect("test state initializes");
        Self {
            router: routes::rate_limited_routes().with_state(state),
        }
    }

    /// Dispatch a raw request and return `(status, parsed JSON body)`.
    ///
    /// Non-JSON and empty bodies come back as `Value::Null`.
    ///
    /// # Panics
    ///
    /// Panics if the router fails to produce a response.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// `GET` a path, optionally with a bearer token.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(build_request("GET", uri, token, None)).await
    }

    /// `POST` a JSON body to a path, optionally with a bearer token.
    pub async fn post(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send(build_request("POST", uri, token, Some(body))).await
    }

    /// `PATCH` a JSON body to a path with a bearer token.
    pub async fn patch(&self, uri: &str, token: &str, body: &Value) -> (StatusCode, Value) {
        self.send(build_request("PATCH", uri, Some(token), Some(body)))
            .await
    }

    /// `DELETE` a path with a bearer token.
    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(build_request("DELETE", uri, Some(token), None))
            .await
    }

    /// Sign up a fresh password account and return `(user, token)`.
    ///
    /// # Panics
    ///
    /// Panics if signup does not succeed.
    pub async fn signup(&self, email: &str, password: &str) -> (Value, String) {
        let (status, body) = self
            .post(
                "/auth/signup",
                None,
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

        let token = body["token"].as_str().expect("token present").to_owned();
        (body["user"].clone(), token)
    }
}

fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    request.expect("static request parts are valid")
}

/// A deterministic client-side wallet for exercising the challenge-response
/// login flow.
pub struct TestWallet {
    key: SigningKey,
}

impl TestWallet {
    /// Build a wallet from a seed byte. Same seed, same wallet.
    ///
    /// # Panics
    ///
    /// Panics if the derived scalar is out of range (it never is for the
    /// seeds tests use).
    #[must_use]
    pub fn new(seed: u8) -> Self {
        let mut bytes = [seed; 32];
        bytes[0] = 0x01; // keep the scalar in range
        Self {
            key: SigningKey::from_slice(&bytes).expect("test key is valid"),
        }
    }

    /// The wallet's lowercase `0x`-prefixed address.
    #[must_use]
    pub fn address(&self) -> String {
        let point = self.key.verifying_key().to_encoded_point(false);
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        format!("0x{}", hex::encode(&digest[12..]))
    }

    /// Sign the challenge for a nonce the way a wallet client would:
    /// EIP-191 envelope, keccak-256, recoverable secp256k1, `v` in 27/28.
    ///
    /// # Panics
    ///
    /// Panics if signing fails (it cannot for a valid key).
    #[must_use]
    pub fn sign_challenge(&self, nonce: &str) -> String {
        let message = challenge_message(nonce);
        let mut hasher = Keccak256::new();
        hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
        hasher.update(message.as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();

        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .expect("signing succeeds");

        let mut raw = signature.to_vec();
        raw.push(recovery_id.to_byte() + 27);
        format!("0x{}", hex::encode(raw))
    }

    /// Run the full nonce-then-login flow against a gateway, returning the
    /// session token.
    ///
    /// # Panics
    ///
    /// Panics if either step fails.
    pub async fn login(&self, gw: &TestGateway) -> String {
        let (status, body) = gw
            .post(
                "/auth/wallet/nonce",
                None,
                &serde_json::json!({ "walletAddress": self.address() }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "nonce request failed: {body}");
        let nonce = body["nonce"].as_str().expect("nonce present").to_owned();

        let (status, body) = gw
            .post(
                "/auth/wallet/login",
                None,
                &serde_json::json!({
                    "walletAddress": self.address(),
                    "nonce": nonce,
                    "signature": self.sign_challenge(&nonce),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "wallet login failed: {body}");
        body["token"].as_str().expect("token present").to_owned()
    }
}
