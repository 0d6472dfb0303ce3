//! Checkout Step Machine
//!
//! The checkout wizard never stores where the client is. The step is read
//! off the session state: the first requirement that is still missing
//! decides it.

use serde::Serialize;

use crate::cart::models::SessionState;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    Cart,
    Login,
    Shipping,
    Payment,
    PlaceOrder,
}

impl CheckoutStep {
    pub fn for_session(session: &SessionState) -> Self {
        if session.cart.cart_items.is_empty() {
            CheckoutStep::Cart
        } else if session.user_info.is_none() {
            CheckoutStep::Login
        } else if !session.cart.shipping_address.is_complete() {
            CheckoutStep::Shipping
        } else if session.cart.payment_method.is_none() {
            CheckoutStep::Payment
        } else {
            CheckoutStep::PlaceOrder
        }
    }

    /// Message shown to a client that tries to place an order too early.
    pub fn missing(self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart is empty",
            CheckoutStep::Login => "Sign in to continue",
            CheckoutStep::Shipping => "Shipping address is incomplete",
            CheckoutStep::Payment => "Payment method is required",
            CheckoutStep::PlaceOrder => "Ready to place order",
        }
    }
}
