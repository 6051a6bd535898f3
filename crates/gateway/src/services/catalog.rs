//! Dataset catalog: listing CRUD, public query pagination, and sampling.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use datamart_core::{ContentKind, ListingId, ListingKind, RecordPrice, UserId};

use crate::models::{DatasetListing, ListingPatch, QueryPage};
use crate::store::{ListingStore, StoreError, UpdateOutcome, timed};

/// Hard cap on rows per query page, regardless of the caller's limit.
pub const MAX_QUERY_LIMIT: usize = 100;

/// Default query page size when the caller does not ask for one.
pub const DEFAULT_QUERY_LIMIT: usize = 25;

/// Hard cap on rows returned by a sample.
pub const MAX_SAMPLE_ROWS: usize = 50;

/// How many times a write is retried after losing a race before giving up.
const MAX_WRITE_ATTEMPTS: usize = 8;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No such listing (or invisible to the caller).
    #[error("listing not found")]
    NotFound,

    /// The listing exists but belongs to another principal. Public surfaces
    /// must collapse this to `NotFound` before responding.
    #[error("listing owned by another principal")]
    Forbidden,

    /// Bad request shape (empty name, invalid cursor, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Request to create a listing from an upload.
///
/// The upload collaborator has already buffered the file bytes and enforced
/// the size limit; the gateway receives the declared MIME type and the
/// parsed row documents.
#[derive(Debug, Clone, Default)]
pub struct CreateListing {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: ListingKind,
    pub price_per_record: RecordPrice,
    pub metadata: serde_json::Map<String, Value>,
    pub schema: Option<Value>,
    pub total_rows: Option<u64>,
    pub quality_score: Option<f64>,
    pub content_summary: Option<String>,
    pub probe_endpoint: Option<String>,
    pub declared_mime: Option<String>,
    pub rows: Vec<Value>,
}

/// Filters for the public query surface.
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    pub category: Option<String>,
    pub kind: Option<ListingKind>,
}

/// Stores and retrieves dataset listings scoped to an owning principal.
#[derive(Clone)]
pub struct DatasetCatalog {
    listings: Arc<dyn ListingStore>,
    store_timeout: Duration,
}

impl DatasetCatalog {
    /// Create a catalog over a listing store.
    #[must_use]
    pub fn new(listings: Arc<dyn ListingStore>, store_timeout: Duration) -> Self {
        Self {
            listings,
            store_timeout,
        }
    }

    /// Create a listing for an owner, deriving a unique endpoint path from
    /// the name.
    ///
    /// Path uniqueness is enforced by the store, not by the read here: a
    /// concurrent create may take the derived path between our read and our
    /// insert, in which case the disambiguation is re-derived and retried.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the name is empty. Price
    /// non-negativity is already guaranteed by [`RecordPrice`].
    pub async fn create(
        &self,
        owner: UserId,
        req: CreateListing,
    ) -> Result<DatasetListing, CatalogError> {
        if req.name.trim().is_empty() {
            return Err(CatalogError::Validation("name cannot be empty".to_owned()));
        }

        let slug = slugify(&req.name);
        let total_rows = req
            .total_rows
            .unwrap_or_else(|| u64::try_from(req.rows.len()).unwrap_or(u64::MAX));
        let content_kind = req
            .declared_mime
            .as_deref()
            .map_or(ContentKind::Unknown, ContentKind::from_mime);

        let mut last_conflict = StoreError::Conflict("endpoint path contention".to_owned());
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let existing = timed(self.store_timeout, self.listings.list_by_owner(owner)).await?;
            let taken: HashSet<String> = existing.into_iter().map(|l| l.endpoint_path).collect();
            let endpoint_path = disambiguate(&slug, &taken);

            let now = Utc::now();
            let listing = DatasetListing {
                id: ListingId::generate(),
                owner_id: owner,
                name: req.name.clone(),
                description: req.description.clone(),
                category: req.category.clone(),
                endpoint_path,
                kind: req.kind,
                price_per_record: req.price_per_record,
                metadata: req.metadata.clone(),
                schema: req.schema.clone(),
                total_rows: Some(total_rows),
                quality_score: req.quality_score,
                content_summary: req.content_summary.clone(),
                probe_endpoint: req.probe_endpoint.clone(),
                content_kind,
                is_active: true,
                created_at: now,
                updated_at: now,
            };

            match timed(
                self.store_timeout,
                self.listings.insert(listing.clone(), req.rows.clone()),
            )
            .await
            {
                Ok(()) => {
                    tracing::info!(
                        listing_id = %listing.id,
                        owner_id = %owner,
                        endpoint_path = %listing.endpoint_path,
                        "listing created"
                    );
                    return Ok(listing);
                }
                // Lost the path to a concurrent create; re-derive and retry.
                Err(err @ StoreError::Conflict(_)) => last_conflict = err,
                Err(err) => return Err(err.into()),
            }
        }
        Err(last_conflict.into())
    }

    /// Apply a partial update to a listing owned by `owner`.
    ///
    /// The write is a compare-and-swap against the record version the patch
    /// was applied to; if a concurrent write lands first, the patch is
    /// re-applied to the fresh record rather than clobbering it with a stale
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the listing does not exist and
    /// `CatalogError::Forbidden` if it belongs to someone else.
    pub async fn update(
        &self,
        owner: UserId,
        id: ListingId,
        patch: ListingPatch,
    ) -> Result<DatasetListing, CatalogError> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let mut listing = timed(self.store_timeout, self.listings.get(id))
                .await?
                .ok_or(CatalogError::NotFound)?;

            if listing.owner_id != owner {
                return Err(CatalogError::Forbidden);
            }

            let read_version = listing.updated_at;
            patch.clone().apply(&mut listing);

            match timed(
                self.store_timeout,
                self.listings.update(listing.clone(), read_version),
            )
            .await?
            {
                UpdateOutcome::Updated => return Ok(listing),
                // Deleted between the read and the write.
                UpdateOutcome::Missing => return Err(CatalogError::NotFound),
                // Lost the race; re-read and re-apply on the fresh record.
                UpdateOutcome::Stale => {}
            }
        }
        Err(CatalogError::Store(StoreError::Conflict(
            "listing update contention".to_owned(),
        )))
    }

    /// Soft-delete a listing by clearing its active flag.
    ///
    /// # Errors
    ///
    /// Same error contract as [`DatasetCatalog::update`].
    pub async fn deactivate(&self, owner: UserId, id: ListingId) -> Result<(), CatalogError> {
        let patch = ListingPatch {
            is_active: Some(false),
            ..ListingPatch::default()
        };
        self.update(owner, id, patch).await.map(|_| ())
    }

    /// All listings owned by a principal, including inactive ones, in
    /// (created_at, id) order. Seller dashboard view.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the listing store is unavailable.
    pub async fn list_own(&self, owner: UserId) -> Result<Vec<DatasetListing>, CatalogError> {
        let mut listings = timed(self.store_timeout, self.listings.list_by_owner(owner)).await?;
        listings.sort_by_key(sort_key);
        Ok(listings)
    }

    /// Number of active listings owned by a principal.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the listing store is unavailable.
    pub async fn count(&self, owner: UserId) -> Result<u64, CatalogError> {
        let listings = timed(self.store_timeout, self.listings.list_by_owner(owner)).await?;
        Ok(listings.iter().filter(|l| l.is_active).count() as u64)
    }

    /// Public query over a seller's active listings.
    ///
    /// Results are ordered by (created_at, id) so pagination is
    /// deterministic; the limit is capped at [`MAX_QUERY_LIMIT`] no matter
    /// what the caller asks for.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an unparseable cursor.
    pub async fn query(
        &self,
        seller: UserId,
        filters: &QueryFilters,
        limit: Option<usize>,
        cursor: Option<&str>,
    ) -> Result<QueryPage, CatalogError> {
        let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).clamp(1, MAX_QUERY_LIMIT);
        let after = cursor.map(decode_cursor).transpose()?;

        let mut matching: Vec<DatasetListing> =
            timed(self.store_timeout, self.listings.list_by_owner(seller))
                .await?
                .into_iter()
                .filter(|l| l.is_active)
                .filter(|l| {
                    filters
                        .category
                        .as_ref()
                        .is_none_or(|c| l.category.as_ref() == Some(c))
                })
                .filter(|l| filters.kind.is_none_or(|k| l.kind == k))
                .collect();
        matching.sort_by_key(sort_key);

        let total = matching.len() as u64;
        let rows: Vec<DatasetListing> = matching
            .into_iter()
            .skip_while(|l| after.is_some_and(|a| sort_key(l) <= a))
            .take(limit + 1)
            .collect();

        let has_more = rows.len() > limit;
        let rows: Vec<DatasetListing> = rows.into_iter().take(limit).collect();
        let next_cursor = if has_more {
            rows.last().map(|l| encode_cursor(&sort_key(l)))
        } else {
            None
        };

        Ok(QueryPage {
            rows,
            total,
            has_more,
            next_cursor,
        })
    }

    /// Size-bounded preview of a listing's content rows.
    ///
    /// Never returns more than `min(limit, MAX_SAMPLE_ROWS, total_rows)`
    /// rows. Inactive listings are indistinguishable from missing ones.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown or inactive listings.
    pub async fn sample(&self, id: ListingId, limit: usize) -> Result<Vec<Value>, CatalogError> {
        let listing = timed(self.store_timeout, self.listings.get(id))
            .await?
            .ok_or(CatalogError::NotFound)?;

        if !listing.is_active {
            return Err(CatalogError::NotFound);
        }

        let mut cap = limit.min(MAX_SAMPLE_ROWS);
        if let Some(total) = listing.total_rows {
            cap = cap.min(usize::try_from(total).unwrap_or(usize::MAX));
        }

        Ok(timed(self.store_timeout, self.listings.rows(id, cap)).await?)
    }

    /// Fetch a listing if it is publicly visible and owned by `seller`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown, inactive, or
    /// differently-owned listings - public callers learn nothing about
    /// other sellers' catalogs.
    pub async fn get_public(
        &self,
        seller: UserId,
        id: ListingId,
    ) -> Result<DatasetListing, CatalogError> {
        let listing = timed(self.store_timeout, self.listings.get(id))
            .await?
            .ok_or(CatalogError::NotFound)?;

        if !listing.is_active || listing.owner_id != seller {
            return Err(CatalogError::NotFound);
        }
        Ok(listing)
    }
}

/// Stable pagination key: creation time truncated to microseconds, then id.
///
/// Truncation matters: the cursor round-trips through a decimal encoding,
/// so the comparison key must survive that round trip exactly.
fn sort_key(listing: &DatasetListing) -> (i64, ListingId) {
    (listing.created_at.timestamp_micros(), listing.id)
}

/// Encode a keyset cursor as URL-safe base64 of `micros:uuid`.
fn encode_cursor(key: &(i64, ListingId)) -> String {
    URL_SAFE_NO_PAD.encode(format!("{}:{}", key.0, key.1.as_uuid()))
}

/// Decode a keyset cursor produced by [`encode_cursor`].
fn decode_cursor(raw: &str) -> Result<(i64, ListingId), CatalogError> {
    let invalid = || CatalogError::Validation("invalid cursor".to_owned());

    let bytes = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid())?;
    let text = String::from_utf8(bytes).map_err(|_| invalid())?;
    let (micros, id) = text.split_once(':').ok_or_else(invalid)?;

    let micros: i64 = micros.parse().map_err(|_| invalid())?;
    let id: Uuid = id.parse().map_err(|_| invalid())?;

    Ok((micros, ListingId::new(id)))
}

/// Derive a URL slug from a listing name: lowercase alphanumerics with
/// hyphen separators.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphens

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "dataset".to_owned()
    } else {
        slug
    }
}

/// Disambiguate a slug against paths already taken in the owner's namespace
/// by appending `-2`, `-3`, ...
fn disambiguate(slug: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(slug) {
        return slug.to_owned();
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{slug}-{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryListingStore;
    use async_trait::async_trait;
    use chrono::DateTime;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> DatasetCatalog {
        DatasetCatalog::new(MemoryListingStore::new(), Duration::from_secs(1))
    }

    /// Delegating store that answers the first `list_by_owner` with an empty
    /// set, as if a concurrent create landed after our uniqueness read.
    struct FirstOwnerReadEmpty {
        inner: Arc<MemoryListingStore>,
        served: AtomicUsize,
    }

    #[async_trait]
    impl ListingStore for FirstOwnerReadEmpty {
        async fn insert(
            &self,
            listing: DatasetListing,
            rows: Vec<Value>,
        ) -> Result<(), StoreError> {
            self.inner.insert(listing, rows).await
        }

        async fn get(&self, id: ListingId) -> Result<Option<DatasetListing>, StoreError> {
            self.inner.get(id).await
        }

        async fn update(
            &self,
            listing: DatasetListing,
            expected_updated_at: DateTime<Utc>,
        ) -> Result<UpdateOutcome, StoreError> {
            self.inner.update(listing, expected_updated_at).await
        }

        async fn rows(&self, id: ListingId, limit: usize) -> Result<Vec<Value>, StoreError> {
            self.inner.rows(id, limit).await
        }

        async fn list_by_owner(
            &self,
            owner: UserId,
        ) -> Result<Vec<DatasetListing>, StoreError> {
            if self.served.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(Vec::new());
            }
            self.inner.list_by_owner(owner).await
        }
    }

    /// Delegating store that answers the first `get` with a pinned stale
    /// snapshot, as if a concurrent write landed between read and write.
    struct FirstGetStale {
        inner: Arc<MemoryListingStore>,
        stale: DatasetListing,
        served: AtomicUsize,
    }

    #[async_trait]
    impl ListingStore for FirstGetStale {
        async fn insert(
            &self,
            listing: DatasetListing,
            rows: Vec<Value>,
        ) -> Result<(), StoreError> {
            self.inner.insert(listing, rows).await
        }

        async fn get(&self, id: ListingId) -> Result<Option<DatasetListing>, StoreError> {
            if self.served.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(Some(self.stale.clone()));
            }
            self.inner.get(id).await
        }

        async fn update(
            &self,
            listing: DatasetListing,
            expected_updated_at: DateTime<Utc>,
        ) -> Result<UpdateOutcome, StoreError> {
            self.inner.update(listing, expected_updated_at).await
        }

        async fn rows(&self, id: ListingId, limit: usize) -> Result<Vec<Value>, StoreError> {
            self.inner.rows(id, limit).await
        }

        async fn list_by_owner(
            &self,
            owner: UserId,
        ) -> Result<Vec<DatasetListing>, StoreError> {
            self.inner.list_by_owner(owner).await
        }
    }

    fn request(name: &str, rows: usize) -> CreateListing {
        CreateListing {
            name: name.to_owned(),
            rows: (0..rows).map(|i| json!({ "row": i })).collect(),
            ..CreateListing::default()
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Weather Data 2026"), "weather-data-2026");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("株式会社"), "dataset");
    }

    #[tokio::test]
    async fn test_create_derives_unique_paths() {
        let catalog = catalog();
        let owner = UserId::generate();

        let a = catalog.create(owner, request("My Data", 0)).await.unwrap();
        let b = catalog.create(owner, request("My Data", 0)).await.unwrap();
        let c = catalog.create(owner, request("My Data", 0)).await.unwrap();

        assert_eq!(a.endpoint_path, "my-data");
        assert_eq!(b.endpoint_path, "my-data-2");
        assert_eq!(c.endpoint_path, "my-data-3");
    }

    #[tokio::test]
    async fn test_create_rederives_path_after_losing_insert_race() {
        let inner = MemoryListingStore::new();
        let owner = UserId::generate();

        // Another create for the same name already landed
        DatasetCatalog::new(inner.clone(), Duration::from_secs(1))
            .create(owner, request("My Data", 0))
            .await
            .unwrap();

        // This catalog's uniqueness read predates that insert; the store
        // rejects the colliding path and the retry picks the next suffix
        let racing = DatasetCatalog::new(
            Arc::new(FirstOwnerReadEmpty {
                inner,
                served: AtomicUsize::new(0),
            }),
            Duration::from_secs(1),
        );
        let listing = racing.create(owner, request("My Data", 0)).await.unwrap();
        assert_eq!(listing.endpoint_path, "my-data-2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_never_share_a_path() {
        let catalog = catalog();
        let owner = UserId::generate();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                catalog.create(owner, request("My Data", 0)).await.unwrap()
            }));
        }

        let mut paths = HashSet::new();
        for handle in handles {
            let listing = handle.await.unwrap();
            assert!(
                paths.insert(listing.endpoint_path),
                "two creates shared an endpoint path"
            );
        }
    }

    #[tokio::test]
    async fn test_racing_patch_does_not_resurrect_deactivated_listing() {
        let inner = MemoryListingStore::new();
        let owner = UserId::generate();
        let direct = DatasetCatalog::new(inner.clone(), Duration::from_secs(1));
        let listing = direct.create(owner, request("d", 0)).await.unwrap();

        // A rename reads this still-active snapshot, then a deactivate lands
        let snapshot = listing.clone();
        direct.deactivate(owner, listing.id).await.unwrap();

        let racing = DatasetCatalog::new(
            Arc::new(FirstGetStale {
                inner: Arc::clone(&inner),
                stale: snapshot,
                served: AtomicUsize::new(0),
            }),
            Duration::from_secs(1),
        );
        let patch = ListingPatch {
            name: Some("renamed".to_owned()),
            ..ListingPatch::default()
        };
        let updated = racing.update(owner, listing.id, patch).await.unwrap();

        assert_eq!(updated.name, "renamed");
        assert!(
            !updated.is_active,
            "stale rename resurrected a deactivated listing"
        );
        assert!(!inner.get(listing.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_create_counts_rows() {
        let catalog = catalog();
        let listing = catalog
            .create(UserId::generate(), request("d", 7))
            .await
            .unwrap();
        assert_eq!(listing.total_rows, Some(7));
        assert!(listing.is_active);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let catalog = catalog();
        let err = catalog.create(UserId::generate(), request("   ", 0)).await;
        assert!(matches!(err, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_enforces_ownership() {
        let catalog = catalog();
        let owner = UserId::generate();
        let listing = catalog.create(owner, request("d", 0)).await.unwrap();

        let err = catalog
            .update(UserId::generate(), listing.id, ListingPatch::default())
            .await;
        assert!(matches!(err, Err(CatalogError::Forbidden)));

        let err = catalog
            .update(owner, ListingId::generate(), ListingPatch::default())
            .await;
        assert!(matches!(err, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_public() {
        let catalog = catalog();
        let owner = UserId::generate();
        let listing = catalog.create(owner, request("d", 3)).await.unwrap();

        catalog.deactivate(owner, listing.id).await.unwrap();

        let err = catalog.sample(listing.id, 10).await;
        assert!(matches!(err, Err(CatalogError::NotFound)));
        assert_eq!(catalog.count(owner).await.unwrap(), 0);

        let page = catalog
            .query(owner, &QueryFilters::default(), None, None)
            .await
            .unwrap();
        assert!(page.rows.is_empty());
    }

    #[tokio::test]
    async fn test_sample_bounded_by_total_rows() {
        let catalog = catalog();
        let listing = catalog
            .create(UserId::generate(), request("d", 10))
            .await
            .unwrap();

        let rows = catalog.sample(listing.id, 50).await.unwrap();
        assert_eq!(rows.len(), 10);
    }

    #[tokio::test]
    async fn test_sample_bounded_by_cap() {
        let catalog = catalog();
        let listing = catalog
            .create(UserId::generate(), request("d", 80))
            .await
            .unwrap();

        let rows = catalog.sample(listing.id, 500).await.unwrap();
        assert_eq!(rows.len(), MAX_SAMPLE_ROWS);
    }

    #[tokio::test]
    async fn test_query_empty_owner() {
        let catalog = catalog();
        let page = catalog
            .query(UserId::generate(), &QueryFilters::default(), None, None)
            .await
            .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 0);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_query_pagination_is_complete_and_duplicate_free() {
        let catalog = catalog();
        let owner = UserId::generate();
        for i in 0..23 {
            catalog
                .create(owner, request(&format!("listing {i}"), 0))
                .await
                .unwrap();
        }

        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;
        loop {
            let page = catalog
                .query(owner, &QueryFilters::default(), Some(5), cursor.as_deref())
                .await
                .unwrap();
            assert_eq!(page.total, 23);
            for row in &page.rows {
                assert!(seen.insert(row.id), "duplicate row across pages");
            }
            pages += 1;
            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
        }

        assert_eq!(seen.len(), 23);
        assert_eq!(pages, 5);
    }

    #[tokio::test]
    async fn test_query_limit_is_capped() {
        let catalog = catalog();
        let owner = UserId::generate();
        for i in 0..105 {
            catalog
                .create(owner, request(&format!("l{i}"), 0))
                .await
                .unwrap();
        }

        let page = catalog
            .query(owner, &QueryFilters::default(), Some(10_000), None)
            .await
            .unwrap();
        assert_eq!(page.rows.len(), MAX_QUERY_LIMIT);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_query_filters() {
        let catalog = catalog();
        let owner = UserId::generate();
        let mut req = request("a", 0);
        req.category = Some("weather".to_owned());
        catalog.create(owner, req).await.unwrap();
        catalog.create(owner, request("b", 0)).await.unwrap();

        let filters = QueryFilters {
            category: Some("weather".to_owned()),
            kind: None,
        };
        let page = catalog.query(owner, &filters, None, None).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_invalid_cursor_rejected() {
        let catalog = catalog();
        let err = catalog
            .query(
                UserId::generate(),
                &QueryFilters::default(),
                None,
                Some("!!not-a-cursor!!"),
            )
            .await;
        assert!(matches!(err, Err(CatalogError::Validation(_))));
    }
}
