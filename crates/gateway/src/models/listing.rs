//! Dataset listing domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use datamart_core::{ContentKind, ListingId, ListingKind, RecordPrice, UserId};

/// A dataset's advertised metadata record, distinct from its underlying
/// content rows.
///
/// Invariants (enforced by the catalog, not this struct):
/// - `endpoint_path` is unique within the owner's namespace
/// - `price_per_record` is non-negative (via [`RecordPrice`])
/// - inactive listings are invisible on the public surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListing {
    /// Unique listing ID.
    pub id: ListingId,
    /// Owning principal (seller).
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional category tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Warehouse endpoint path, derived from the name, unique per owner.
    pub endpoint_path: String,
    /// How the listing is served.
    pub kind: ListingKind,
    /// Price per record.
    pub price_per_record: RecordPrice,
    /// Free-form metadata document. The gateway treats this as opaque.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
    /// Optional JSON-schema-shaped description of the rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Total number of rows in the dataset, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u64>,
    /// Optional quality score in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Optional human-readable content summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_summary: Option<String>,
    /// Optional probe endpoint consumers can hit to test freshness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_endpoint: Option<String>,
    /// Classification of the uploaded content's declared MIME type.
    pub content_kind: ContentKind,
    /// Soft-delete flag; `false` hides the listing from public callers.
    pub is_active: bool,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Partial update to a listing. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_record: Option<RecordPrice>,
    pub metadata: Option<serde_json::Map<String, Value>>,
    pub schema: Option<Value>,
    pub total_rows: Option<u64>,
    pub quality_score: Option<f64>,
    pub content_summary: Option<String>,
    pub probe_endpoint: Option<String>,
    pub is_active: Option<bool>,
}

impl ListingPatch {
    /// Apply this patch to a listing, bumping `updated_at`.
    pub fn apply(self, listing: &mut DatasetListing) {
        if let Some(name) = self.name {
            listing.name = name;
        }
        if let Some(description) = self.description {
            listing.description = Some(description);
        }
        if let Some(category) = self.category {
            listing.category = Some(category);
        }
        if let Some(price) = self.price_per_record {
            listing.price_per_record = price;
        }
        if let Some(metadata) = self.metadata {
            listing.metadata = metadata;
        }
        if let Some(schema) = self.schema {
            listing.schema = Some(schema);
        }
        if let Some(total_rows) = self.total_rows {
            listing.total_rows = Some(total_rows);
        }
        if let Some(quality_score) = self.quality_score {
            listing.quality_score = Some(quality_score);
        }
        if let Some(content_summary) = self.content_summary {
            listing.content_summary = Some(content_summary);
        }
        if let Some(probe_endpoint) = self.probe_endpoint {
            listing.probe_endpoint = Some(probe_endpoint);
        }
        if let Some(is_active) = self.is_active {
            listing.is_active = is_active;
        }
        listing.updated_at = Utc::now();
    }
}

/// One page of a public catalog query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    /// Listings on this page, in (created_at, id) order.
    pub rows: Vec<DatasetListing>,
    /// Total number of listings matching the filter, across all pages.
    pub total: u64,
    /// Whether more pages exist after this one.
    pub has_more: bool,
    /// Continuation cursor for the next page, when `has_more` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// A size-bounded preview of a listing's content rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleResult {
    pub rows: Vec<Value>,
}
