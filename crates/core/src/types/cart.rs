//! The cart value type.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by product id.
//! It is never mutated in place: each change produces a new `Cart`, leaving
//! every previously handed-out snapshot intact.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{LineItem, ProductId, Quantity};

/// Ordered collection of line items, at most one per product.
///
/// Serializes as a bare JSON array of [`LineItem`]. Deserializing rejects
/// arrays that contain the same product id twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount.get())).sum()
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Returns a cart with `item` appended, or replacing the existing entry
    /// for the same product in place.
    #[must_use]
    pub fn with_item(&self, item: LineItem) -> Self {
        let mut items = self.items.clone();
        match items.iter().position(|i| i.product_id == item.product_id) {
            Some(index) => {
                if let Some(slot) = items.get_mut(index) {
                    *slot = item;
                }
            }
            None => items.push(item),
        }
        Self { items }
    }

    /// Returns a cart where the product's amount is replaced, or `None` if
    /// the product is not in the cart.
    #[must_use]
    pub fn with_amount(&self, product_id: ProductId, amount: Quantity) -> Option<Self> {
        let current = self.get(product_id)?;
        Some(self.with_item(current.with_amount(amount)))
    }

    /// Returns a cart without the product, or `None` if it was not present.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        for (index, item) in items.iter().enumerate() {
            if items
                .iter()
                .skip(index + 1)
                .any(|other| other.product_id == item.product_id)
            {
                return Err(serde::de::Error::custom(format!(
                    "duplicate product id {} in cart",
                    item.product_id
                )));
            }
        }
        Ok(Self { items })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
