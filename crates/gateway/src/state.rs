//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::services::{AuthError, AuthService, DatasetCatalog, NonceRegistry, TokenIssuer};
use crate::store::{ListingStore, MemoryListingStore, MemoryNonceStore, MemoryUserStore, NonceStore, UserStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configured services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    auth: AuthService,
    nonces: NonceRegistry,
    catalog: DatasetCatalog,
    tokens: TokenIssuer,
}

impl AppState {
    /// Create application state backed by in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the authentication service cannot initialize.
    pub fn new(config: GatewayConfig) -> Result<Self, AuthError> {
        Self::with_stores(
            config,
            MemoryUserStore::new(),
            MemoryNonceStore::new(),
            MemoryListingStore::new(),
        )
    }

    /// Create application state over explicit store implementations.
    ///
    /// # Errors
    ///
    /// Returns an error if the authentication service cannot initialize.
    pub fn with_stores(
        config: GatewayConfig,
        users: Arc<dyn UserStore>,
        nonces: Arc<dyn NonceStore>,
        listings: Arc<dyn ListingStore>,
    ) -> Result<Self, AuthError> {
        let registry = NonceRegistry::new(nonces, config.nonce_ttl, config.store_timeout);
        let auth = AuthService::new(users, registry.clone(), config.store_timeout)?;
        let catalog = DatasetCatalog::new(listings, config.store_timeout);
        let tokens = TokenIssuer::new(&config.token_secret, config.token_ttl);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                nonces: registry,
                catalog,
                tokens,
            }),
        })
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the wallet nonce registry.
    #[must_use]
    pub fn nonces(&self) -> &NonceRegistry {
        &self.inner.nonces
    }

    /// Get a reference to the dataset catalog.
    #[must_use]
    pub fn catalog(&self) -> &DatasetCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the session token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }
}
