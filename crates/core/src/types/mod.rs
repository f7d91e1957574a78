//! Core types for the RocketShoes cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod quantity;

pub use cart::Cart;
pub use id::*;
pub use line_item::LineItem;
pub use quantity::{Quantity, QuantityError};
