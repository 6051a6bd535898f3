//! Authenticated listing-management route handlers.
//!
//! Everything here is scoped to the bearer principal: sellers only ever see
//! and mutate their own listings.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use datamart_core::{ListingId, ListingKind, RecordPrice};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{DatasetListing, ListingPatch};
use crate::services::catalog::CreateListing;
use crate::state::AppState;

/// Listing creation request body.
///
/// `rows` carries the parsed content documents from the upload collaborator;
/// `mimeType` is the upload's declared MIME type, used for content
/// classification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub kind: ListingKind,
    #[serde(default)]
    pub price_per_record: RecordPrice,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
    pub schema: Option<Value>,
    pub total_rows: Option<u64>,
    pub quality_score: Option<f64>,
    pub content_summary: Option<String>,
    pub probe_endpoint: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub rows: Vec<Value>,
}

/// Active listing count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// `POST /api/listings` - create a listing from an upload.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(owner): RequireAuth,
    Json(req): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<DatasetListing>)> {
    let listing = state
        .catalog()
        .create(
            owner,
            CreateListing {
                name: req.name,
                description: req.description,
                category: req.category,
                kind: req.kind,
                price_per_record: req.price_per_record,
                metadata: req.metadata,
                schema: req.schema,
                total_rows: req.total_rows,
                quality_score: req.quality_score,
                content_summary: req.content_summary,
                probe_endpoint: req.probe_endpoint,
                declared_mime: req.mime_type,
                rows: req.rows,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// `GET /api/listings` - the owner's listings, including inactive ones.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(owner): RequireAuth,
) -> Result<Json<Vec<DatasetListing>>> {
    Ok(Json(state.catalog().list_own(owner).await?))
}

/// `GET /api/listings/count` - number of active listings owned.
pub async fn count(
    State(state): State<AppState>,
    RequireAuth(owner): RequireAuth,
) -> Result<Json<CountResponse>> {
    let count = state.catalog().count(owner).await?;
    Ok(Json(CountResponse { count }))
}

/// `PATCH /api/listings/{id}` - partial update to an owned listing.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(owner): RequireAuth,
    Path(id): Path<ListingId>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<DatasetListing>> {
    let listing = state.catalog().update(owner, id, patch).await?;
    Ok(Json(listing))
}

/// `DELETE /api/listings/{id}` - deactivate an owned listing.
///
/// Soft delete: the listing disappears from public surfaces but stays in the
/// owner's dashboard view.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAuth(owner): RequireAuth,
    Path(id): Path<ListingId>,
) -> Result<StatusCode> {
    state.catalog().deactivate(owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
