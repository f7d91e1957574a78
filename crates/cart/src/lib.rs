//! RocketShoes cart library.
//!
//! Client-side cart state: line items are added, removed and re-counted
//! through a [`CartStore`], checked against a remote stock endpoint, and
//! written back to a key-value [`PersistentStore`] after every change.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use rocketshoes_cart::{CartConfig, CartStore, FileStore, StockClient};
//!
//! let config = CartConfig::from_env()?;
//! let stock = Arc::new(StockClient::new(&config.api)?);
//! let storage = Arc::new(FileStore::new(&config.storage.path));
//!
//! let store = CartStore::load(stock, storage, config.storage.key.clone());
//! let cart = store.add_one(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notify;
pub mod stock;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, StockApiConfig, StorageConfig};
pub use error::CartError;
pub use notify::{CartOperation, Notifier, TracingNotifier, report};
pub use stock::{Product, Stock, StockClient, StockError, StockService};
pub use storage::{FileStore, MemoryStore, PersistentStore, StorageError};
pub use store::{CartStore, DEFAULT_STORAGE_KEY, read_stored_cart};
