//! Per-record dataset pricing using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`RecordPrice`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum RecordPriceError {
    /// The price is below zero.
    #[error("price per record cannot be negative: {0}")]
    Negative(Decimal),
}

/// The price charged per record of a dataset listing.
///
/// Prices are exact decimals (never floats) and are guaranteed non-negative.
/// A zero price marks a free dataset.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use datamart_core::RecordPrice;
///
/// assert!(RecordPrice::new(Decimal::new(5, 2)).is_ok()); // 0.05
/// assert!(RecordPrice::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct RecordPrice(Decimal);

impl RecordPrice {
    /// A free dataset.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a `RecordPrice` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`RecordPriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, RecordPriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(RecordPriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for RecordPrice {
    type Error = RecordPriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<RecordPrice> for Decimal {
    fn from(price: RecordPrice) -> Self {
        price.0
    }
}

impl fmt::Display for RecordPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
