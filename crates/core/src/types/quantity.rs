//! Validated line-item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The requested amount is zero or negative.
    #[error("amount must be at least 1 (got {0})")]
    NotPositive(i64),
    /// The requested amount does not fit in a `u32`.
    #[error("amount must be at most {max} (got {got})")]
    TooLarge {
        /// Maximum allowed amount.
        max: u32,
        /// The rejected amount.
        got: i64,
    },
}

/// Number of units of one product in the cart.
///
/// A `Quantity` is always at least 1. Zero and negative amounts are rejected
/// at construction, including when a quantity is deserialized from stored
/// cart data.
///
/// ## Examples
///
/// ```
/// use rocketshoes_core::Quantity;
///
/// assert_eq!(Quantity::new(3).unwrap().get(), 3);
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity from a requested amount.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is zero, negative, or larger than `u32::MAX`.
    pub fn new(amount: i64) -> Result<Self, QuantityError> {
        if amount <= 0 {
            return Err(QuantityError::NotPositive(amount));
        }
        u32::try_from(amount)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge {
                max: u32::MAX,
                got: amount,
            })
    }

    /// Returns the amount as a `u32`.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the quantity one unit larger, or `None` on overflow.
    #[must_use]
    pub fn incremented(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        Self::from(quantity.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-5), Err(QuantityError::NotPositive(-5)));
    }

    #[test]
    fn test_rejects_overflow() {
        let too_big = i64::from(u32::MAX) + 1;
        assert!(matches!(
            Quantity::new(too_big),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_incremented() {
        assert_eq!(Quantity::ONE.incremented(), Some(Quantity::new(2).unwrap()));
        assert_eq!(Quantity::new(i64::from(u32::MAX)).unwrap().incremented(), None);
    }

    #[test]
    fn test_deserialize_validates() {
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().get(), 4);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            QuantityError::NotPositive(0).to_string(),
            "amount must be at least 1 (got 0)"
        );
    }
}
