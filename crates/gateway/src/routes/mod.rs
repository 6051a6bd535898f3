//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! POST /auth/signup                     - Email/password signup
//! POST /auth/login                      - Email/password login
//! POST /auth/wallet/nonce               - Issue a wallet login challenge
//! POST /auth/wallet/login               - Complete wallet challenge-response login
//!
//! # Listings (requires auth, owner-scoped)
//! POST   /api/listings                  - Create a listing from an upload
//! GET    /api/listings                  - Owner's listings, including inactive
//! GET    /api/listings/count            - Owner's active listing count
//! PATCH  /api/listings/{id}             - Partial update
//! DELETE /api/listings/{id}             - Deactivate (soft delete)
//!
//! # Public catalog
//! GET /sellers/{seller_id}/query                       - Paginated listing query
//! GET /sellers/{seller_id}/listings/{id}/sample        - Bounded content preview
//! ```

pub mod auth;
pub mod listings;
pub mod public;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/wallet/nonce", post(auth::wallet_nonce))
        .route("/wallet/login", post(auth::wallet_login))
}

/// Create the authenticated listing-management routes router.
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(listings::create).get(listings::index))
        .route("/count", get(listings::count))
        .route(
            "/{id}",
            axum::routing::patch(listings::update).delete(listings::deactivate),
        )
}

/// Create the public catalog routes router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/{seller_id}/query", get(public::query))
        .route("/{seller_id}/listings/{id}/sample", get(public::sample))
}

/// Create all routes for the gateway, without rate limiting.
///
/// Test suites use this directly; the binary wraps the auth and API route
/// groups in [`rate_limited_routes`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/api/listings", listing_routes())
        .nest("/sellers", public_routes())
}

/// Create all routes with per-IP rate limiting applied.
///
/// Auth endpoints get the strict limiter; everything else the general API
/// limiter. The health endpoint is never limited so deploy probes cannot be
/// starved by traffic.
pub fn rate_limited_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/auth",
            auth_routes().layer(rate_limit::auth_rate_limiter()),
        )
        .nest(
            "/api/listings",
            listing_routes().layer(rate_limit::api_rate_limiter()),
        )
        .nest(
            "/sellers",
            public_routes().layer(rate_limit::api_rate_limiter()),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
