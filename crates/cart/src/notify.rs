//! User-facing notifications for cart outcomes.
//!
//! The store itself never notifies; it returns a `Result`. Front ends pass
//! that result to [`report`], which picks the message and hands it to a
//! [`Notifier`].

use rocketshoes_core::QuantityError;

use crate::error::CartError;

/// Presents short success/error messages to a user.
///
/// Fire-and-forget: nothing is returned and failures are not reported back.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that writes messages to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "rocketshoes_cart::notice", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes_cart::notice", "{message}");
    }
}

/// The cart mutation whose outcome is being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Message shown when the operation succeeds.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Add => "Product added to cart",
            Self::Remove => "Product removed from cart",
            Self::Update => "Product amount updated",
        }
    }

    /// Generic message shown when the operation fails for a reason the user
    /// cannot act on directly (missing item, lookup failure).
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::Remove => "Error removing product",
            Self::Update => "Error updating product amount",
        }
    }

    /// Message for a rejected operation.
    #[must_use]
    pub const fn error_message(self, error: &CartError) -> &'static str {
        match error {
            CartError::OutOfStock { .. } => "Requested quantity is out of stock",
            CartError::InvalidAmount(QuantityError::NotPositive(_)) => {
                "Zero or negative amounts are not allowed"
            }
            CartError::InvalidAmount(QuantityError::TooLarge { .. }) => {
                "Requested amount is too large"
            }
            CartError::NotFound(_) | CartError::Lookup(_) => self.failure_message(),
        }
    }
}

/// Notify the user about the outcome of a cart operation.
pub fn report<T>(notifier: &dyn Notifier, operation: CartOperation, result: &Result<T, CartError>) {
    match result {
        Ok(_) => notifier.success(operation.success_message()),
        Err(error) => notifier.error(operation.error_message(error)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use rocketshoes_core::ProductId;

    use super::*;
    use crate::stock::StockError;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<(bool, String)>>,
    }

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.lock().push((true, message.to_string()));
        }

        fn error(&self, message: &str) {
            self.lock().push((false, message.to_string()));
        }
    }

    impl Recorder {
        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(bool, String)>> {
            self.messages.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn take(&self) -> Vec<(bool, String)> {
            std::mem::take(&mut *self.lock())
        }
    }

    #[test]
    fn test_report_success() {
        let recorder = Recorder::default();
        report(&recorder, CartOperation::Add, &Ok::<(), CartError>(()));
        assert_eq!(recorder.take(), vec![(true, "Product added to cart".to_string())]);
    }

    #[test]
    fn test_report_out_of_stock_and_invalid_amount() {
        let recorder = Recorder::default();
        let out_of_stock: Result<(), CartError> = Err(CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        });
        report(&recorder, CartOperation::Update, &out_of_stock);

        let invalid: Result<(), CartError> = Err(QuantityError::NotPositive(0).into());
        report(&recorder, CartOperation::Update, &invalid);

        assert_eq!(
            recorder.take(),
            vec![
                (false, "Requested quantity is out of stock".to_string()),
                (false, "Zero or negative amounts are not allowed".to_string()),
            ]
        );
    }

    #[test]
    fn test_too_large_amount_has_its_own_message() {
        let recorder = Recorder::default();
        let too_large: Result<(), CartError> = Err(QuantityError::TooLarge {
            max: u32::MAX,
            got: 5_000_000_000,
        }
        .into());

        report(&recorder, CartOperation::Update, &too_large);

        assert_eq!(
            recorder.take(),
            vec![(false, "Requested amount is too large".to_string())]
        );
    }

    #[test]
    fn test_not_found_and_lookup_share_generic_message() {
        let not_found = CartError::NotFound(ProductId::new(1));
        let lookup = CartError::Lookup(StockError::NotFound(ProductId::new(1)));

        for op in [CartOperation::Add, CartOperation::Remove, CartOperation::Update] {
            assert_eq!(op.error_message(&not_found), op.failure_message());
            assert_eq!(op.error_message(&lookup), op.failure_message());
        }
        assert_eq!(CartOperation::Remove.failure_message(), "Error removing product");
    }
}
