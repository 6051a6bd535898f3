//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GATEWAY_TOKEN_SECRET` - Session-token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `GATEWAY_HOST` - Bind address (default: 127.0.0.1)
//! - `GATEWAY_PORT` - Listen port (default: 3000)
//! - `GATEWAY_TOKEN_TTL_HOURS` - Session token lifetime (default: 24)
//! - `GATEWAY_NONCE_TTL_SECS` - Wallet login nonce lifetime (default: 300)
//! - `GATEWAY_STORE_TIMEOUT_MS` - Per-call store timeout (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Session-token signing secret
    pub token_secret: SecretString,
    /// Session token lifetime
    pub token_ttl: chrono::Duration,
    /// Wallet login nonce lifetime
    pub nonce_ttl: chrono::Duration,
    /// Per-call timeout on store operations
    pub store_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the token secret fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_or_default("GATEWAY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GATEWAY_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_PORT".to_string(), e.to_string()))?;

        let token_secret = get_validated_secret("GATEWAY_TOKEN_SECRET")?;

        let token_ttl_hours = parse_env_or_default("GATEWAY_TOKEN_TTL_HOURS", 24_i64)?;
        let nonce_ttl_secs = parse_env_or_default("GATEWAY_NONCE_TTL_SECS", 300_i64)?;
        let store_timeout_ms = parse_env_or_default("GATEWAY_STORE_TIMEOUT_MS", 2000_u64)?;

        Ok(Self {
            host,
            port,
            token_secret,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            nonce_ttl: chrono::Duration::seconds(nonce_ttl_secs),
            store_timeout: Duration::from_millis(store_timeout_ms),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable into a numeric value, with a default.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Load a secret from the environment and validate its strength.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))?;

    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    validate_secret_strength(&value, key)?;

    Ok(SecretString::from(value))
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_flat_string_is_low() {
        assert!(shannon_entropy("aaaaaaaaaaaaaaaa") < 1.0);
    }

    #[test]
    fn test_validate_rejects_placeholder() {
        let err = validate_secret_strength("changeme-changeme-changeme-1234567890", "TEST");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_accepts_random_secret() {
        // 32 bytes of base64-looking randomness
        let ok = validate_secret_strength("qN3vZ8kXw1pL5rT9bYhJ2mFcAd7eGu4s", "TEST");
        assert!(ok.is_ok());
    }
}
