//! Wallet login challenge registry.
//!
//! Issues single-use nonces bound to a wallet address. A wallet has at most
//! one live nonce: a fresh `generate` overwrites whatever came before, so an
//! attacker cannot stockpile challenges. Consumption is atomic in the store;
//! exactly one of N concurrent submissions of the same nonce wins.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore as _;

use datamart_core::WalletAddress;

use super::auth::AuthError;
use crate::store::{ConsumeOutcome, NonceRecord, NonceStore, timed};

/// Bytes of entropy per nonce (256 bits).
const NONCE_BYTES: usize = 32;

/// A freshly issued challenge.
#[derive(Debug, Clone)]
pub struct IssuedNonce {
    /// The URL-safe challenge value to be embedded in the signed message.
    pub nonce: String,
    /// When the challenge stops being consumable.
    pub expires_at: DateTime<Utc>,
}

/// Issues and consumes wallet login challenges.
#[derive(Clone)]
pub struct NonceRegistry {
    store: Arc<dyn NonceStore>,
    ttl: chrono::Duration,
    store_timeout: Duration,
}

impl NonceRegistry {
    /// Create a registry over a nonce store.
    #[must_use]
    pub fn new(store: Arc<dyn NonceStore>, ttl: chrono::Duration, store_timeout: Duration) -> Self {
        Self {
            store,
            ttl,
            store_timeout,
        }
    }

    /// Issue a fresh challenge for a wallet, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the nonce store is unavailable.
    pub async fn generate(&self, wallet: &WalletAddress) -> Result<IssuedNonce, AuthError> {
        let mut bytes = [0u8; NONCE_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let value = URL_SAFE_NO_PAD.encode(bytes);

        let now = Utc::now();
        let expires_at = now + self.ttl;
        let record = NonceRecord {
            wallet: wallet.clone(),
            value: value.clone(),
            issued_at: now,
            expires_at,
            consumed: false,
        };

        timed(self.store_timeout, self.store.put(record)).await?;

        tracing::debug!(wallet = %wallet, expires_at = %expires_at, "issued wallet nonce");

        Ok(IssuedNonce {
            nonce: value,
            expires_at,
        })
    }

    /// Atomically consume a challenge ahead of signature verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NonceMismatch` if no live nonce with this value
    /// exists for the wallet, `AuthError::NonceExpired` if its TTL elapsed,
    /// or `AuthError::Store` if the nonce store is unavailable. Mismatch and
    /// expiry leave the stored record untouched.
    pub async fn consume(&self, wallet: &WalletAddress, value: &str) -> Result<(), AuthError> {
        let outcome = timed(
            self.store_timeout,
            self.store.consume(wallet, value, Utc::now()),
        )
        .await?;

        match outcome {
            ConsumeOutcome::Consumed => Ok(()),
            ConsumeOutcome::Mismatch => Err(AuthError::NonceMismatch),
            ConsumeOutcome::Expired => Err(AuthError::NonceExpired),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryNonceStore;

    fn registry_with_ttl(ttl: chrono::Duration) -> NonceRegistry {
        NonceRegistry::new(MemoryNonceStore::new(), ttl, Duration::from_secs(1))
    }

    fn wallet() -> WalletAddress {
        WalletAddress::parse("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap()
    }

    #[tokio::test]
    async fn test_generate_then_consume() {
        let registry = registry_with_ttl(chrono::Duration::minutes(5));
        let issued = registry.generate(&wallet()).await.unwrap();

        registry.consume(&wallet(), &issued.nonce).await.unwrap();
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let registry = registry_with_ttl(chrono::Duration::minutes(5));
        let issued = registry.generate(&wallet()).await.unwrap();

        registry.consume(&wallet(), &issued.nonce).await.unwrap();
        let err = registry.consume(&wallet(), &issued.nonce).await;
        assert!(matches!(err, Err(AuthError::NonceMismatch)));
    }

    #[tokio::test]
    async fn test_second_generate_invalidates_first() {
        let registry = registry_with_ttl(chrono::Duration::minutes(5));
        let first = registry.generate(&wallet()).await.unwrap();
        let second = registry.generate(&wallet()).await.unwrap();
        assert_ne!(first.nonce, second.nonce);

        let err = registry.consume(&wallet(), &first.nonce).await;
        assert!(matches!(err, Err(AuthError::NonceMismatch)));
        registry.consume(&wallet(), &second.nonce).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_nonce_rejected() {
        let registry = registry_with_ttl(chrono::Duration::zero());
        let issued = registry.generate(&wallet()).await.unwrap();

        let err = registry.consume(&wallet(), &issued.nonce).await;
        assert!(matches!(err, Err(AuthError::NonceExpired)));
    }

    #[tokio::test]
    async fn test_nonce_has_enough_entropy() {
        let registry = registry_with_ttl(chrono::Duration::minutes(5));
        let issued = registry.generate(&wallet()).await.unwrap();
        // 32 bytes base64url without padding is 43 characters
        assert_eq!(issued.nonce.len(), 43);
    }
}
