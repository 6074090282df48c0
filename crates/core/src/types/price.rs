//! Type-safe unit price using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so that values like `19.99` survive
//! arithmetic and formatting without binary floating point drift. On the
//! wire (the persisted cart snapshot) a price is a plain JSON number, which
//! keeps snapshots readable by any JSON consumer. A `Price` therefore only
//! holds amounts that survive the trip through `f64` unchanged.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number: {0}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount has more precision than a JSON number can carry.
    #[error("price {0} cannot be stored without losing precision")]
    Imprecise(Decimal),
    /// A stored number does not fit in a decimal amount.
    #[error("price {0} is out of range")]
    OutOfRange(String),
}

/// A non-negative unit price in the store's currency.
///
/// ## Examples
///
/// ```
/// use go_marketplace_core::Price;
///
/// let price: Price = "19.99".parse().unwrap();
/// assert_eq!(price.to_string(), "19.99");
///
/// assert!("-1".parse::<Price>().is_err());
/// assert!("ten".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero and
    /// [`PriceError::Imprecise`] if it does not convert to `f64` and back
    /// unchanged.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }

        let exact = to_wire(amount)
            .and_then(|float| Decimal::from_str(&float.to_string()).ok())
            .is_some_and(|back| back == amount);
        if !exact {
            return Err(PriceError::Imprecise(amount));
        }

        Ok(Self(amount.normalize()))
    }

    /// Create a price from a stored JSON number.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] if the number does not fit in a
    /// [`Decimal`], or [`PriceError::Negative`] if it is below zero.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        let rendered = value.to_string();
        let amount =
            Decimal::from_str(&rendered).map_err(|_| PriceError::OutOfRange(rendered))?;
        Self::new(amount)
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

/// Nearest `f64` to `amount`, via its decimal text so the result is correctly rounded.
fn to_wire(amount: Decimal) -> Option<f64> {
    amount.to_string().parse().ok()
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(format!("{s}: {e}")))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = to_wire(self.0)
            .ok_or_else(|| serde::ser::Error::custom(format!("price {} is not a number", self.0)))?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_f64(value).map_err(serde::de::Error::custom)
    }
}
