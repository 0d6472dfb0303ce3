//! Order Domain Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    cart::models::{CartLine, PaymentMethod, ShippingAddress},
    checkout::OrderTotals,
    db::{new_id, Document},
};

/// A purchased line, frozen at the price the customer saw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Id of the purchased product
    #[serde(rename = "_id")]
    pub product: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub quantity: u32,
}

impl From<CartLine> for OrderItem {
    fn from(line: CartLine) -> Self {
        Self {
            product: line.id,
            name: line.name,
            slug: line.slug,
            image: line.image,
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// What the payment provider reported back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub email_address: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    /// Id of the ordering user
    pub user: String,

    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,

    #[serde(flatten)]
    pub totals: OrderTotals,

    pub is_paid: bool,
    pub is_delivered: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Order {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Order {
    /// A new unpaid order; totals are always derived from `order_items`.
    pub fn new(user: String, input: PlaceOrderInput) -> Self {
        let now = Utc::now();
        let totals = OrderTotals::from_lines(
            input
                .order_items
                .iter()
                .map(|item| (item.price, item.quantity)),
        );

        Self {
            id: new_id(),
            user,
            order_items: input.order_items,
            shipping_address: input.shipping_address,
            payment_method: input.payment_method,
            payment_result: None,
            totals,
            is_paid: false,
            is_delivered: false,
            paid_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_paid(&mut self, result: PaymentResult) {
        let now = Utc::now();
        self.is_paid = true;
        self.paid_at = Some(now);
        self.payment_result = Some(result);
        self.updated_at = now;
    }

    pub fn mark_delivered(&mut self) {
        let now = Utc::now();
        self.is_delivered = true;
        self.delivered_at = Some(now);
        self.updated_at = now;
    }
}

/// Body of `POST /api/orders`. Client-side price totals, if sent, are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderInput {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// An order as the admin console lists it, with the buyer's name resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
}
