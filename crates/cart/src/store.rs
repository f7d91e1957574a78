//! The cart store.
//!
//! [`CartStore`] owns the current [`Cart`], validates quantity increases
//! against a [`StockService`] and writes the whole cart to a
//! [`PersistentStore`] after every successful change.
//!
//! # Concurrency
//!
//! Mutations are serialized by a single writer lock held from the first
//! read of the cart until the commit, including the stock lookup. Two
//! concurrent `add_one` calls for the same product therefore see each
//! other's result. Readers never wait on the writer: [`CartStore::cart`]
//! returns the last committed snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{Cart, ProductId, Quantity, QuantityError};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::error::CartError;
use crate::stock::{Stock, StockService};
use crate::storage::{PersistentStore, StorageError};

/// Key the cart is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Stock-validated, persisted shopping cart.
///
/// Cheaply cloneable via `Arc`; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    stock: Arc<dyn StockService>,
    storage: Arc<dyn PersistentStore>,
    key: String,
    current: RwLock<Arc<Cart>>,
    writer: Mutex<()>,
}

impl CartStore {
    /// Create a store, reading the initial cart from `storage`.
    ///
    /// A missing value yields an empty cart. A value that cannot be read or
    /// parsed is logged and also yields an empty cart; it is overwritten by
    /// the next successful mutation.
    pub fn load(
        stock: Arc<dyn StockService>,
        storage: Arc<dyn PersistentStore>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let cart = read_stored_cart(storage.as_ref(), &key);

        Self {
            inner: Arc::new(CartStoreInner {
                stock,
                storage,
                key,
                current: RwLock::new(Arc::new(cart)),
                writer: Mutex::new(()),
            }),
        }
    }

    /// The last committed cart.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(
            &self
                .inner
                .current
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its amount incremented; a new
    /// product is fetched from the stock service and appended with amount 1.
    ///
    /// # Errors
    ///
    /// - `CartError::OutOfStock` if the incremented amount exceeds stock
    /// - `CartError::Lookup` if the stock or product lookup fails
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_one(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let _writer = self.inner.writer.lock().await;
        let cart = self.cart();
        let existing = cart.get(product_id);

        let desired = match existing {
            Some(item) => item.amount.incremented().ok_or(QuantityError::TooLarge {
                max: u32::MAX,
                got: i64::from(u32::MAX) + 1,
            })?,
            None => Quantity::ONE,
        };

        let stock = self.lookup_stock(product_id).await?;
        ensure_in_stock(product_id, i64::from(desired), stock)?;

        let updated = if let Some(item) = existing {
            cart.with_item(item.with_amount(desired))
        } else {
            let product = self.inner.stock.product(product_id).await.map_err(|e| {
                warn!(error = %e, "Product lookup failed");
                CartError::from(e)
            })?;
            let mut item = product.into_line_item(Quantity::ONE);
            item.product_id = product_id;
            cart.with_item(item)
        };

        Ok(self.commit(updated))
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is not in the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_one(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let _writer = self.inner.writer.lock().await;

        let updated = self.cart().without(product_id).ok_or_else(|| {
            warn!("Remove rejected: product not in cart");
            CartError::NotFound(product_id)
        })?;

        Ok(self.commit(updated))
    }

    /// Set the amount of a product already in the cart.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidAmount` if `amount` is zero or negative (no lookup is made)
    /// - `CartError::OutOfStock` if `amount` exceeds stock
    /// - `CartError::InvalidAmount` if stock covers `amount` but it does not fit a [`Quantity`]
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Lookup` if the stock lookup fails
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Arc<Cart>, CartError> {
        if amount <= 0 {
            warn!(amount, "Update rejected: amount must be positive");
            return Err(QuantityError::NotPositive(amount).into());
        }

        let _writer = self.inner.writer.lock().await;

        let stock = self.lookup_stock(product_id).await?;
        ensure_in_stock(product_id, amount, stock)?;

        let amount = Quantity::new(amount).map_err(|e| {
            warn!(error = %e, "Update rejected: invalid amount");
            CartError::from(e)
        })?;

        let updated = self.cart().with_amount(product_id, amount).ok_or_else(|| {
            warn!("Update rejected: product not in cart");
            CartError::NotFound(product_id)
        })?;

        Ok(self.commit(updated))
    }

    async fn lookup_stock(&self, product_id: ProductId) -> Result<Stock, CartError> {
        self.inner.stock.stock(product_id).await.map_err(|e| {
            warn!(error = %e, "Stock lookup failed");
            CartError::from(e)
        })
    }

    /// Publish `cart` as the current cart and write it to storage.
    ///
    /// Must be called with the writer lock held.
    fn commit(&self, cart: Cart) -> Arc<Cart> {
        let cart = Arc::new(cart);

        if let Err(e) = self.persist(&cart) {
            warn!(error = %e, key = %self.inner.key, "Failed to persist cart");
        }

        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&cart);

        info!(
            items = cart.len(),
            units = cart.item_count(),
            "Cart committed"
        );
        cart
    }

    fn persist(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        self.inner.storage.set(&self.inner.key, &json)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

fn ensure_in_stock(product_id: ProductId, requested: i64, stock: Stock) -> Result<(), CartError> {
    if stock.covers(requested) {
        return Ok(());
    }
    warn!(
        requested,
        available = stock.amount,
        "Rejected: requested quantity out of stock"
    );
    Err(CartError::OutOfStock {
        product_id,
        requested,
        available: stock.amount,
    })
}

/// Read the cart stored under `key` without a stock service.
///
/// A missing, unreadable or malformed value yields an empty cart.
#[must_use]
pub fn read_stored_cart(storage: &dyn PersistentStore, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(json)) => match serde_json::from_str::<Cart>(&json) {
            Ok(cart) => {
                info!(key, items = cart.len(), "Loaded stored cart");
                cart
            }
            Err(e) => {
                warn!(key, error = %e, "Stored cart is malformed, starting with an empty cart");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored cart, starting with an empty cart");
            Cart::new()
        }
    }
}
