//! Stock and product lookups.
//!
//! # Architecture
//!
//! - [`StockService`] is the seam the cart store depends on; tests swap in
//!   their own implementation
//! - [`StockClient`] talks to the REST API over `reqwest`
//! - Product metadata is cached in-memory via `moka`; stock quantities are
//!   always fetched fresh
//!
//! # Endpoints
//!
//! - `GET stock/{id}` → `{ "amount": 3 }`
//! - `GET products/{id}` → `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`

mod client;

pub use client::StockClient;

use async_trait::async_trait;
use rocketshoes_core::{LineItem, ProductId, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when looking up stock or product data.
#[derive(Debug, Error)]
pub enum StockError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The product is unknown to the API.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Available quantity for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub amount: i64,
}

impl Stock {
    /// Whether `requested` units can be taken from this stock.
    #[must_use]
    pub const fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}

/// Product metadata as served by the products endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(alias = "image")]
    pub image_url: String,
}

impl Product {
    /// Build a cart line for this product.
    #[must_use]
    pub fn into_line_item(self, amount: Quantity) -> LineItem {
        LineItem {
            product_id: self.id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
            amount,
        }
    }
}

/// Source of stock quantities and product metadata.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Current stock for a product.
    async fn stock(&self, product_id: ProductId) -> Result<Stock, StockError>;

    /// Metadata for a product.
    async fn product(&self, product_id: ProductId) -> Result<Product, StockError>;
}
