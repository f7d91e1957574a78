//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to 2 units
//! rs-cart set 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//! ```
//!
//! # Environment Variables
//!
//! See `rocketshoes_cart::config` for the full list. `CART_API_URL` is
//! required for every command except `show`.

use std::sync::Arc;

use rocketshoes_cart::{
    CartConfig, CartError, CartOperation, CartStore, ConfigError, FileStore, StockClient,
    StockError, StorageConfig, TracingNotifier, read_stored_cart, report,
};
use rocketshoes_core::{Cart, ProductId};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stock client could not be built.
    #[error("Stock client error: {0}")]
    Client(#[from] StockError),

    /// The cart rejected the operation.
    #[error("{0}")]
    Rejected(#[from] CartError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Build a store from environment configuration.
fn open_store() -> Result<CartStore, CommandError> {
    let config = CartConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let stock = Arc::new(StockClient::new(&config.api)?);
    let storage = Arc::new(FileStore::new(&config.storage.path));

    Ok(CartStore::load(stock, storage, config.storage.key))
}

/// Read the stored cart from local storage only.
fn read_cart(storage: &StorageConfig) -> Cart {
    read_stored_cart(&FileStore::new(&storage.path), &storage.key)
}

/// Print the stored cart.
///
/// Only reads local storage, so the stock API need not be configured.
#[allow(clippy::print_stdout)]
pub fn show(json: bool) -> Result<(), CommandError> {
    let storage = StorageConfig::from_env()?;
    tracing::debug!(?storage, "Loaded storage configuration");
    let cart = read_cart(&storage);

    if json {
        println!("{}", serde_json::to_string_pretty(&cart)?);
    } else {
        print_cart(&cart);
    }
    Ok(())
}

/// Add one unit of a product.
pub async fn add(product_id: ProductId) -> Result<(), CommandError> {
    let store = open_store()?;
    let result = store.add_one(product_id).await;
    finish(CartOperation::Add, result)
}

/// Remove a product.
pub async fn remove(product_id: ProductId) -> Result<(), CommandError> {
    let store = open_store()?;
    let result = store.remove_one(product_id).await;
    finish(CartOperation::Remove, result)
}

/// Set the amount of a product.
pub async fn set(product_id: ProductId, amount: i64) -> Result<(), CommandError> {
    let store = open_store()?;
    let result = store.set_amount(product_id, amount).await;
    finish(CartOperation::Update, result)
}

fn finish(
    operation: CartOperation,
    result: Result<Arc<Cart>, CartError>,
) -> Result<(), CommandError> {
    report(&TracingNotifier, operation, &result);
    let cart = result?;
    print_cart(&cart);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    println!(
        "{:>6}  {:<40}  {:>10}  {:>6}  {:>12}",
        "ID", "PRODUCT", "PRICE", "QTY", "TOTAL"
    );
    for item in cart {
        println!(
            "{:>6}  {:<40}  {:>10.2}  {:>6}  {:>12.2}",
            item.product_id.as_i32(),
            truncate(&item.name, 40),
            item.price,
            item.amount.get(),
            item.line_total()
        );
    }
    println!(
        "{} products, {} units, subtotal {:.2}",
        cart.len(),
        cart.item_count(),
        cart.subtotal()
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use rocketshoes_cart::PersistentStore;

    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a much longer name", 6), "a muc…");
    }

    #[test]
    fn test_read_cart_needs_only_storage_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = StorageConfig {
            key: "@RocketShoes:cart".to_string(),
            path: dir.path().join("cart.json"),
        };
        assert!(read_cart(&storage).is_empty());

        let stored = r#"[{"productId":3,"name":"Tenis","price":99.9,"imageUrl":"","amount":2}]"#;
        FileStore::new(&storage.path)
            .set(&storage.key, stored)
            .expect("write cart");

        let cart = read_cart(&storage);
        assert_eq!(cart.get(ProductId::new(3)).map(|l| l.amount.get()), Some(2));
    }

    #[test]
    fn test_rejected_error_displays_cart_error() {
        let err = CommandError::from(CartError::NotFound(ProductId::new(4)));
        assert_eq!(err.to_string(), "Not found: product 4 is not in the cart");
    }
}
