//! Public catalog route handlers.
//!
//! Unauthenticated query and sample surfaces scoped to a seller. Ownership
//! and existence failures all collapse to 404 here, so callers cannot probe
//! which listing IDs exist outside the seller's public catalog.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use datamart_core::{ListingId, ListingKind, UserId};

use crate::error::{AppError, Result};
use crate::models::{QueryPage, SampleResult};
use crate::services::catalog::{MAX_SAMPLE_ROWS, QueryFilters};
use crate::state::AppState;

/// Query string for the public listing query.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub category: Option<String>,
    pub kind: Option<ListingKind>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

/// Query string for the sample endpoint.
#[derive(Debug, Deserialize)]
pub struct SampleParams {
    pub limit: Option<usize>,
}

/// `GET /sellers/{seller_id}/query` - paginated query over a seller's
/// active listings.
pub async fn query(
    State(state): State<AppState>,
    Path(seller_id): Path<UserId>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryPage>> {
    let filters = QueryFilters {
        category: params.category,
        kind: params.kind,
    };

    let page = state
        .catalog()
        .query(seller_id, &filters, params.limit, params.cursor.as_deref())
        .await
        .map_err(|e| AppError::from(e).for_public())?;

    Ok(Json(page))
}

/// `GET /sellers/{seller_id}/listings/{id}/sample` - bounded preview of a
/// listing's content rows.
pub async fn sample(
    State(state): State<AppState>,
    Path((seller_id, id)): Path<(UserId, ListingId)>,
    Query(params): Query<SampleParams>,
) -> Result<Json<SampleResult>> {
    // Resolve through the seller's public catalog first so a listing owned
    // by someone else looks identical to a missing one.
    state
        .catalog()
        .get_public(seller_id, id)
        .await
        .map_err(|e| AppError::from(e).for_public())?;

    let rows = state
        .catalog()
        .sample(id, params.limit.unwrap_or(MAX_SAMPLE_ROWS))
        .await
        .map_err(|e| AppError::from(e).for_public())?;

    Ok(Json(SampleResult { rows }))
}
