//! Authentication middleware and extractors.
//!
//! Provides an extractor for requiring a bearer session token in route
//! handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use datamart_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid bearer session token.
///
/// Yields the authenticated principal's id. Rejects with 401 when the
/// `Authorization` header is missing, malformed, or carries an invalid or
/// expired token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user_id): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {user_id}!")
/// }
/// ```
pub struct RequireAuth(pub UserId);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

        let user_id = state.tokens().validate(token)?;
        crate::error::set_sentry_user(&user_id, None);
        Ok(Self(user_id))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            bearer_token(&parts_with_auth(Some("Bearer abc.def.ghi"))),
            Some("abc.def.ghi")
        );
        assert_eq!(bearer_token(&parts_with_auth(None)), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("bearer abc"))), None);
    }
}
