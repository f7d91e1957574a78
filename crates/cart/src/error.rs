//! Cart operation errors.
//!
//! Every `CartStore` mutation returns `Result<_, CartError>`. An error
//! always means the cart was left unchanged.

use rocketshoes_core::{ProductId, QuantityError};
use thiserror::Error;

use crate::stock::StockError;

/// Why a cart mutation was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// The target amount exceeds the available stock.
    #[error("Out of stock: requested {requested} of product {product_id}, {available} available")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The requested amount is zero, negative or too large.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] QuantityError),

    /// The product is not in the cart.
    #[error("Not found: product {0} is not in the cart")]
    NotFound(ProductId),

    /// Stock or product lookup failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] StockError),
}
