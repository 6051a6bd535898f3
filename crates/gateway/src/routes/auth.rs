//! Authentication route handlers.
//!
//! Password signup/login plus the two-step wallet flow: request a challenge
//! nonce, then submit the signed challenge to log in. Both login variants
//! respond with the user and a bearer session token.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use datamart_core::WalletAddress;

use crate::error::Result;
use crate::models::User;
use crate::state::AppState;

/// Signup/login request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Wallet challenge request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest {
    pub wallet_address: String,
}

/// Wallet login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletLoginRequest {
    pub wallet_address: String,
    pub nonce: String,
    pub signature: String,
}

/// Issued wallet challenge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub nonce: String,
    pub expires_at: DateTime<Utc>,
}

/// Successful authentication: the principal plus a bearer session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

/// `POST /auth/signup` - register a new email/password account.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let user = state.auth().signup(&req.email, &req.password).await?;
    let token = state.tokens().issue(user.id)?;

    Ok((StatusCode::CREATED, Json(SessionResponse { user, token })))
}

/// `POST /auth/login` - email/password login.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>> {
    let user = state.auth().login(&req.email, &req.password).await?;
    let token = state.tokens().issue(user.id)?;

    Ok(Json(SessionResponse { user, token }))
}

/// `POST /auth/wallet/nonce` - issue a single-use wallet login challenge.
///
/// Always replaces any prior live challenge for the wallet.
pub async fn wallet_nonce(
    State(state): State<AppState>,
    Json(req): Json<NonceRequest>,
) -> Result<Json<NonceResponse>> {
    let wallet = parse_wallet(&req.wallet_address)?;
    let issued = state.nonces().generate(&wallet).await?;

    Ok(Json(NonceResponse {
        nonce: issued.nonce,
        expires_at: issued.expires_at,
    }))
}

/// `POST /auth/wallet/login` - complete a wallet challenge-response login.
///
/// Provisions a user record on first successful login for an unseen wallet.
pub async fn wallet_login(
    State(state): State<AppState>,
    Json(req): Json<WalletLoginRequest>,
) -> Result<Json<SessionResponse>> {
    let wallet = parse_wallet(&req.wallet_address)?;
    let user = state
        .auth()
        .wallet_login(&wallet, &req.nonce, &req.signature)
        .await?;
    let token = state.tokens().issue(user.id)?;

    Ok(Json(SessionResponse { user, token }))
}

fn parse_wallet(raw: &str) -> Result<WalletAddress> {
    Ok(WalletAddress::parse(raw).map_err(crate::services::AuthError::from)?)
}
