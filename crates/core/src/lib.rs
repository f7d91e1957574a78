//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the value types used by the cart store and its
//! front ends:
//! - `cart` - `CartStore`, stock client and persistence
//! - `cli` - Command-line driver for a persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Every mutation on [`Cart`] returns a new value, so a
//! snapshot handed to a caller never changes underneath it.
//!
//! # Modules
//!
//! - [`types`] - Product ids, validated quantities, line items and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
