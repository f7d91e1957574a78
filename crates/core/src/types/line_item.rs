//! A single product entry in the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductId, Quantity};

/// One product in the cart together with the number of units.
///
/// Serialized in camelCase with `price` as a JSON number, which is the
/// format written to persistent storage:
///
/// ```json
/// {"productId":1,"name":"Running shoe","price":179.9,"imageUrl":"https://...","amount":2}
/// ```
///
/// The storefront API names some of these fields differently (`id`,
/// `title`, `image`); those names are accepted as aliases when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(alias = "image")]
    pub image_url: String,
    pub amount: Quantity,
}

impl LineItem {
    /// Returns a copy of this item with a different amount.
    #[must_use]
    pub fn with_amount(&self, amount: Quantity) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Unit price multiplied by the amount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.amount.get())
    }
}
