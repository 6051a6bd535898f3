//! In-memory store implementations.
//!
//! These back the default binary wiring and the test suites. Maps are held
//! behind `tokio::sync` primitives; the nonce map uses a `Mutex` so consume
//! attempts are atomic (check and mark under one guard).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use datamart_core::{Email, ListingId, UserId, WalletAddress};

use super::{
    ConsumeOutcome, ListingStore, NonceRecord, NonceStore, StoreError, UpdateOutcome, UserStore,
};
use crate::models::{DatasetListing, User};

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: Option<String>,
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).map(|r| r.user.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|r| r.user.email.as_ref() == Some(email))
            .map(|r| r.user.clone()))
    }

    async fn find_by_wallet(&self, wallet: &WalletAddress) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|r| r.user.wallet_address.as_ref() == Some(wallet))
            .map(|r| r.user.clone()))
    }

    async fn insert(&self, user: User, password_hash: Option<String>) -> Result<(), StoreError> {
        let mut users = self.users.write().await;

        if let Some(email) = &user.email
            && users.values().any(|r| r.user.email.as_ref() == Some(email))
        {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        if let Some(wallet) = &user.wallet_address
            && users
                .values()
                .any(|r| r.user.wallet_address.as_ref() == Some(wallet))
        {
            return Err(StoreError::Conflict("wallet already exists".to_owned()));
        }

        users.insert(
            user.id,
            UserRecord {
                user,
                password_hash,
            },
        );
        Ok(())
    }

    async fn password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|r| r.user.email.as_ref() == Some(email))
            .and_then(|r| {
                r.password_hash
                    .as_ref()
                    .map(|hash| (r.user.clone(), hash.clone()))
            }))
    }
}

/// In-memory [`NonceStore`].
#[derive(Debug, Default)]
pub struct MemoryNonceStore {
    nonces: Mutex<HashMap<WalletAddress, NonceRecord>>,
}

impl MemoryNonceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl NonceStore for MemoryNonceStore {
    async fn put(&self, record: NonceRecord) -> Result<(), StoreError> {
        self.nonces
            .lock()
            .await
            .insert(record.wallet.clone(), record);
        Ok(())
    }

    async fn consume(
        &self,
        wallet: &WalletAddress,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<ConsumeOutcome, StoreError> {
        let mut nonces = self.nonces.lock().await;

        let Some(record) = nonces.get_mut(wallet) else {
            return Ok(ConsumeOutcome::Mismatch);
        };

        if record.consumed || record.value != value {
            return Ok(ConsumeOutcome::Mismatch);
        }

        if now >= record.expires_at {
            return Ok(ConsumeOutcome::Expired);
        }

        record.consumed = true;
        Ok(ConsumeOutcome::Consumed)
    }
}

#[derive(Debug, Clone)]
struct ListingRecord {
    listing: DatasetListing,
    rows: Vec<Value>,
}

/// In-memory [`ListingStore`].
#[derive(Debug, Default)]
pub struct MemoryListingStore {
    listings: RwLock<HashMap<ListingId, ListingRecord>>,
}

impl MemoryListingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn insert(&self, listing: DatasetListing, rows: Vec<Value>) -> Result<(), StoreError> {
        let mut listings = self.listings.write().await;
        if listings.contains_key(&listing.id) {
            return Err(StoreError::Conflict("listing id already exists".to_owned()));
        }
        if listings.values().any(|r| {
            r.listing.owner_id == listing.owner_id
                && r.listing.endpoint_path == listing.endpoint_path
        }) {
            return Err(StoreError::Conflict(
                "endpoint path already taken for owner".to_owned(),
            ));
        }
        listings.insert(listing.id, ListingRecord { listing, rows });
        Ok(())
    }

    async fn get(&self, id: ListingId) -> Result<Option<DatasetListing>, StoreError> {
        Ok(self
            .listings
            .read()
            .await
            .get(&id)
            .map(|r| r.listing.clone()))
    }

    async fn update(
        &self,
        listing: DatasetListing,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut listings = self.listings.write().await;
        match listings.get_mut(&listing.id) {
            Some(record) if record.listing.updated_at == expected_updated_at => {
                record.listing = listing;
                Ok(UpdateOutcome::Updated)
            }
            Some(_) => Ok(UpdateOutcome::Stale),
            None => Ok(UpdateOutcome::Missing),
        }
    }

    async fn rows(&self, id: ListingId, limit: usize) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .listings
            .read()
            .await
            .get(&id)
            .map(|r| r.rows.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<DatasetListing>, StoreError> {
        Ok(self
            .listings
            .read()
            .await
            .values()
            .filter(|r| r.listing.owner_id == owner)
            .map(|r| r.listing.clone())
            .collect())
    }
}
