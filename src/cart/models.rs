//! Shopping Cart Domain Models
//!
//! This module contains the session state held by the cart store: cart
//! lines, shipping address, payment method and the logged-in user.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::models::Product;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Returns the default quantity (1) for cart lines
fn default_quantity() -> u32 {
    1
}

/// One cart entry: a product snapshot plus the requested quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product identifier; at most one line per id
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub image: String,

    pub price: f64,

    /// Stock at the time the line was added
    #[serde(default)]
    pub count_in_stock: u32,

    /// Quantity of this product (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            image: product.image.clone(),
            price: product.price,
            count_in_stock: product.count_in_stock,
            quantity,
        }
    }
}

/// A geocoded point picked on the map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,

    /// Free-text address, e.g. `"123 Main St, Springfield, IL 62704, USA"`
    pub address: String,

    /// Captures any extra geocoder fields (place name, vicinity, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ShippingAddress {
    /// Whether the fields checkout needs are filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.full_name,
            &self.address,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
    }
}

/// Partial shipping address; present fields overwrite the stored ones
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressPatch {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    PayPal,
    Stripe,
    Cash,
}

/// The logged-in user as the client sees it, including the signed credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub cart_items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<PaymentMethod>,
}

/// Root session state, one per client
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub dark_mode: bool,
    pub cart: Cart,
    pub user_info: Option<SessionUser>,
}

/// Body of `POST /api/cart/items`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    pub product_id: String,

    /// Desired quantity; defaults to one more than what is already in the cart
    pub quantity: Option<u32>,
}
