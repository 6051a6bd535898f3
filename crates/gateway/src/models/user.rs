//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use datamart_core::{Email, UserId, WalletAddress};

/// A marketplace principal.
///
/// Exactly one of `email` or `wallet_address` is present at creation time
/// (password signup vs. first wallet login); an account may later hold both.
/// The password hash is never part of this type - the store keeps it in a
/// separate record, like any other credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address (absent for wallet-only accounts).
    pub email: Option<Email>,
    /// Linked wallet address (absent for password-only accounts).
    pub wallet_address: Option<WalletAddress>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh password-account user.
    #[must_use]
    pub fn with_email(email: Email) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: Some(email),
            wallet_address: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a fresh wallet-account user.
    #[must_use]
    pub fn with_wallet(wallet: WalletAddress) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: None,
            wallet_address: Some(wallet),
            created_at: now,
            updated_at: now,
        }
    }
}
