//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{AuthError, CatalogError};
use crate::store::StoreError;

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Collapse ownership failures into `NotFound` for public surfaces, so
    /// unauthenticated callers cannot probe which listing IDs exist. The
    /// collapsed response is byte-identical to a genuine miss.
    #[must_use]
    pub fn for_public(self) -> Self {
        match self {
            Self::Catalog(CatalogError::Forbidden) => Self::Catalog(CatalogError::NotFound),
            other => other,
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Store(_)
                | Self::Auth(AuthError::Store(_) | AuthError::PasswordHash)
                | Self::Catalog(CatalogError::Store(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(err) => store_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredential
                | AuthError::NonceExpired
                | AuthError::NonceMismatch
                | AuthError::SignatureInvalid
                | AuthError::TokenExpired
                | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateAccount => StatusCode::CONFLICT,
                AuthError::WeakCredential(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidWallet(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Store(err) => store_status(err),
            },
            Self::Catalog(err) => match err {
                CatalogError::NotFound => StatusCode::NOT_FOUND,
                CatalogError::Forbidden => StatusCode::FORBIDDEN,
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::Store(err) => store_status(err),
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        };

        // Don't expose internal error details to clients
        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            "Service temporarily unavailable".to_owned()
        } else if status.is_server_error() {
            "Internal server error".to_owned()
        } else {
            match &self {
                Self::Auth(err) => match err {
                    AuthError::InvalidCredential => "Invalid credentials".to_owned(),
                    AuthError::DuplicateAccount => {
                        "An account with this email already exists".to_owned()
                    }
                    AuthError::WeakCredential(msg) => msg.clone(),
                    AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                    AuthError::InvalidWallet(_) => "Invalid wallet address".to_owned(),
                    AuthError::NonceExpired => "Challenge expired, request a new one".to_owned(),
                    AuthError::NonceMismatch => "Unknown or already used challenge".to_owned(),
                    AuthError::SignatureInvalid => "Signature verification failed".to_owned(),
                    AuthError::TokenExpired => "Session expired".to_owned(),
                    AuthError::TokenInvalid => "Invalid session token".to_owned(),
                    AuthError::PasswordHash | AuthError::Store(_) => {
                        "Internal server error".to_owned()
                    }
                },
                Self::Catalog(err) => match err {
                    CatalogError::NotFound => "Listing not found".to_owned(),
                    CatalogError::Forbidden => "You do not own this listing".to_owned(),
                    CatalogError::Validation(msg) => msg.clone(),
                    CatalogError::Store(_) => "Internal server error".to_owned(),
                },
                _ => self.to_string(),
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Store failures split by retryability: a blown deadline is a 503 the
/// client may retry, everything else is a plain 500.
fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Conflict(_) | StoreError::Corruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
