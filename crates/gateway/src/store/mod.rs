//! Persistence abstraction for the gateway.
//!
//! The gateway never talks to a concrete database; it is handed store trait
//! objects at startup. Each trait exposes simple key-based operations so an
//! implementation can sit on any KV- or row-shaped backend. The in-memory
//! implementations in [`memory`] back both the default binary wiring and the
//! test suites.
//!
//! Store operations are treated as potentially slow: call sites wrap them in
//! [`timed`], which converts a blown deadline into
//! [`StoreError::Unavailable`] instead of hanging the request.

pub mod memory;

pub use memory::{MemoryListingStore, MemoryNonceStore, MemoryUserStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use datamart_core::{Email, ListingId, UserId, WalletAddress};

use crate::models::{DatasetListing, User};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store did not answer within its deadline or is unreachable.
    /// The only store error callers may retry (idempotent reads only).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Constraint violation (e.g., duplicate email or wallet).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    Corruption(String),
}

/// Await a store future with a deadline.
///
/// # Errors
///
/// Returns [`StoreError::Unavailable`] if the deadline elapses, otherwise
/// whatever the store call returned.
pub async fn timed<T, F>(deadline: std::time::Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| StoreError::Unavailable(format!("deadline of {deadline:?} exceeded")))?
}

/// A single-use wallet login challenge, keyed by wallet address.
#[derive(Debug, Clone)]
pub struct NonceRecord {
    /// Wallet address this nonce is bound to.
    pub wallet: WalletAddress,
    /// The random challenge value.
    pub value: String,
    /// When the nonce was issued.
    pub issued_at: DateTime<Utc>,
    /// When the nonce stops being consumable.
    pub expires_at: DateTime<Utc>,
    /// Whether the nonce has been spent.
    pub consumed: bool,
}

/// Result of an atomic nonce consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The nonce matched, was live, and is now spent.
    Consumed,
    /// No live nonce with that value exists for the wallet.
    Mismatch,
    /// The nonce matched but its TTL had elapsed.
    Expired,
}

/// Store for user records and their password credentials.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by ID.
    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    /// Fetch a user by linked wallet address.
    async fn find_by_wallet(&self, wallet: &WalletAddress) -> Result<Option<User>, StoreError>;

    /// Insert a new user, optionally with a password hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the email or wallet address is
    /// already registered.
    async fn insert(&self, user: User, password_hash: Option<String>) -> Result<(), StoreError>;

    /// Fetch a user together with their stored password hash, by email.
    ///
    /// Returns `None` if the email is unknown or the account has no password
    /// credential.
    async fn password_hash(&self, email: &Email)
    -> Result<Option<(User, String)>, StoreError>;
}

/// Store for wallet login nonces. At most one live nonce per wallet.
#[async_trait]
pub trait NonceStore: Send + Sync {
    /// Store a nonce for a wallet, replacing any prior record.
    async fn put(&self, record: NonceRecord) -> Result<(), StoreError>;

    /// Atomically consume a nonce: succeeds only if the stored record
    /// matches `value`, is unconsumed, and `now` is before its expiry.
    /// On [`ConsumeOutcome::Consumed`] the record is marked spent; on any
    /// other outcome the record is untouched. Exactly one of N concurrent
    /// calls with the same live value may observe `Consumed`.
    async fn consume(
        &self,
        wallet: &WalletAddress,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<ConsumeOutcome, StoreError>;
}

/// Result of a compare-and-swap listing update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The stored record matched the expected version and was replaced.
    Updated,
    /// No listing with that id exists.
    Missing,
    /// The stored record changed since it was read; nothing was written.
    Stale,
}

/// Store for dataset listings and their content rows.
///
/// Writes are serialized by the implementation: `insert` checks the
/// per-owner endpoint-path constraint under the same guard that persists the
/// record, and `update` is a compare-and-swap keyed on the stored record's
/// `updated_at`. Callers that lose a race re-read and retry.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert a new listing along with its content rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the listing id, or the
    /// `(owner_id, endpoint_path)` pair, is already taken.
    async fn insert(&self, listing: DatasetListing, rows: Vec<Value>) -> Result<(), StoreError>;

    /// Fetch a listing by ID.
    async fn get(&self, id: ListingId) -> Result<Option<DatasetListing>, StoreError>;

    /// Replace a listing record, but only if its stored `updated_at` still
    /// equals `expected_updated_at`. [`UpdateOutcome::Stale`] means a
    /// concurrent write landed first and nothing was written.
    async fn update(
        &self,
        listing: DatasetListing,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Fetch up to `limit` content rows for a listing, in stored order.
    async fn rows(&self, id: ListingId, limit: usize) -> Result<Vec<Value>, StoreError>;

    /// All listings owned by a principal, in unspecified order.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<DatasetListing>, StoreError>;
}
