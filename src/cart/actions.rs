//! The fixed set of actions that mutate session state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::{CartLine, Location, PaymentMethod, SessionUser, ShippingAddressPatch};

/// Identifies the cart line to remove. Any other fields of the payload are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

/// Wire form: `{"type": "CART_ADD_ITEM", "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    DarkModeOn,
    DarkModeOff,
    CartAddItem(CartLine),
    CartRemoveItem(ItemRef),
    CartClear,
    SaveShippingAddress(ShippingAddressPatch),
    SaveShippingAddressMapLocation(Location),
    SavePaymentMethod(PaymentMethod),
    UserLogin(SessionUser),
    UserLogout,
}

impl Action {
    pub const KINDS: [&'static str; 10] = [
        "DARK_MODE_ON",
        "DARK_MODE_OFF",
        "CART_ADD_ITEM",
        "CART_REMOVE_ITEM",
        "CART_CLEAR",
        "SAVE_SHIPPING_ADDRESS",
        "SAVE_SHIPPING_ADDRESS_MAP_LOCATION",
        "SAVE_PAYMENT_METHOD",
        "USER_LOGIN",
        "USER_LOGOUT",
    ];

    /// Decodes a raw action. Unknown kinds decode to `Ok(None)` so callers can
    /// treat them as no-ops; a known kind with a bad payload is an error.
    pub fn from_raw(raw: Value) -> Result<Option<Action>, serde_json::Error> {
        let known = raw
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|kind| Self::KINDS.contains(&kind));
        if !known {
            return Ok(None);
        }
        serde_json::from_value(raw).map(Some)
    }
}
