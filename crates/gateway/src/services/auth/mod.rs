//! Authentication service.
//!
//! Provides password signup/login and the wallet challenge-response login
//! flow. Wallet login consumes the nonce strictly before verifying the
//! signature, so a failed verification still burns the challenge and replay
//! is impossible.

mod error;

pub use error::AuthError;

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use datamart_core::{Email, WalletAddress};

use super::nonce::NonceRegistry;
use super::signature;
use crate::models::User;
use crate::store::{StoreError, UserStore, timed};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles password accounts and wallet challenge-response login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    nonces: NonceRegistry,
    store_timeout: Duration,
    /// Hash of a throwaway password, verified against when the email is
    /// unknown so both login failure paths cost one argon2 verification.
    decoy_hash: String,
}

impl AuthService {
    /// Create a new authentication service.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the decoy hash cannot be built.
    pub fn new(
        users: Arc<dyn UserStore>,
        nonces: NonceRegistry,
        store_timeout: Duration,
    ) -> Result<Self, AuthError> {
        let decoy_hash = hash_password("decoy-password-for-timing")?;
        Ok(Self {
            users,
            nonces,
            store_timeout,
            decoy_hash,
        })
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// `AuthError::WeakCredential` if the password is too short, and
    /// `AuthError::DuplicateAccount` if the email is already registered.
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let user = User::with_email(email);

        timed(
            self.store_timeout,
            self.users.insert(user.clone(), Some(password_hash)),
        )
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::DuplicateAccount,
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` on unknown email or password
    /// mismatch - deliberately the same error for both.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let Some((user, password_hash)) =
            timed(self.store_timeout, self.users.password_hash(&email)).await?
        else {
            // Unknown email: burn a verification anyway so the two failure
            // paths have the same latency shape.
            let _ = verify_password(password, &self.decoy_hash);
            return Err(AuthError::InvalidCredential);
        };

        verify_password(password, &password_hash)?;
        Ok(user)
    }

    // =========================================================================
    // Wallet Authentication
    // =========================================================================

    /// Complete a wallet challenge-response login.
    ///
    /// The nonce is consumed before the signature is checked, so each
    /// challenge is good for exactly one verification attempt. On first
    /// successful login for an unseen wallet, a user record is provisioned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NonceMismatch`/`AuthError::NonceExpired` from the
    /// consume step, and `AuthError::SignatureInvalid` when the signature
    /// does not recover to the claimed wallet.
    pub async fn wallet_login(
        &self,
        wallet: &WalletAddress,
        nonce: &str,
        sig: &str,
    ) -> Result<User, AuthError> {
        self.nonces.consume(wallet, nonce).await?;

        if !signature::verify(wallet, nonce, sig) {
            tracing::warn!(wallet = %wallet, "wallet signature rejected");
            return Err(AuthError::SignatureInvalid);
        }

        if let Some(user) = timed(self.store_timeout, self.users.find_by_wallet(wallet)).await? {
            return Ok(user);
        }

        // First successful login for this wallet: provision an account.
        let user = User::with_wallet(wallet.clone());
        match timed(self.store_timeout, self.users.insert(user.clone(), None)).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, wallet = %wallet, "wallet user provisioned");
                Ok(user)
            }
            // Lost a provisioning race; the concurrent winner's record is ours.
            Err(StoreError::Conflict(_)) => {
                timed(self.store_timeout, self.users.find_by_wallet(wallet))
                    .await?
                    .ok_or(AuthError::InvalidCredential)
            }
            Err(other) => Err(AuthError::Store(other)),
        }
    }
}

/// Validate the minimum password policy.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakCredential(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{MemoryNonceStore, MemoryUserStore};

    fn service() -> AuthService {
        let registry = NonceRegistry::new(
            MemoryNonceStore::new(),
            chrono::Duration::minutes(5),
            Duration::from_secs(1),
        );
        AuthService::new(MemoryUserStore::new(), registry, Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let auth = service();
        let user = auth.signup("a@x.com", "longenough1").await.unwrap();
        let logged_in = auth.login("a@x.com", "longenough1").await.unwrap();
        assert_eq!(user.id, logged_in.id);
    }

    #[tokio::test]
    async fn test_duplicate_signup_rejected() {
        let auth = service();
        auth.signup("a@x.com", "longenough1").await.unwrap();
        let err = auth.signup("a@x.com", "longenough1").await;
        assert!(matches!(err, Err(AuthError::DuplicateAccount)));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let auth = service();
        let err = auth.signup("a@x.com", "short").await;
        assert!(matches!(err, Err(AuthError::WeakCredential(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.signup("a@x.com", "longenough1").await.unwrap();

        let unknown = auth.login("b@x.com", "longenough1").await;
        let wrong = auth.login("a@x.com", "wrongpassword").await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredential)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_password_hashes_are_salted() {
        let a = hash_password("longenough1").unwrap();
        let b = hash_password("longenough1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("longenough1", &a).is_ok());
        assert!(verify_password("longenough1", &b).is_ok());
    }
}
