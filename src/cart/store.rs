//! Shopping Cart State Management
//!
//! [`reduce`] is the pure transition function over [`SessionState`].
//! [`CartStore`] owns the current state together with a [`Storage`] and,
//! after every transition, mirrors the fields that should survive a reload.
//! The in-memory state is authoritative; storage is only a projection of it.

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use super::{
    actions::Action,
    helpers::{merge_shipping_address, parse_map_location, upsert_line},
    models::{Cart, SessionState},
    storage::{
        Storage, CART_ITEMS_KEY, DARK_MODE_KEY, PAYMENT_METHOD_KEY, SHIPPING_ADDRESS_KEY,
        USER_INFO_KEY,
    },
};

// =============================================================================
// Transitions
// =============================================================================

/// Computes the state that follows `action`.
pub fn reduce(state: &SessionState, action: &Action) -> SessionState {
    let mut next = state.clone();

    match action {
        Action::DarkModeOn => next.dark_mode = true,
        Action::DarkModeOff => next.dark_mode = false,
        Action::CartAddItem(line) => {
            next.cart.cart_items = upsert_line(&state.cart.cart_items, line.clone());
        }
        Action::CartRemoveItem(item) => {
            next.cart.cart_items.retain(|line| line.id != item.id);
        }
        Action::CartClear => next.cart.cart_items.clear(),
        Action::SaveShippingAddress(patch) => {
            next.cart.shipping_address = merge_shipping_address(&state.cart.shipping_address, patch);
        }
        Action::SaveShippingAddressMapLocation(location) => {
            next.cart.shipping_address =
                parse_map_location(&state.cart.shipping_address, location);
        }
        Action::SavePaymentMethod(method) => next.cart.payment_method = Some(*method),
        Action::UserLogin(user) => next.user_info = Some(user.clone()),
        Action::UserLogout => {
            next = SessionState {
                dark_mode: false,
                cart: Cart::default(),
                user_info: None,
            };
        }
    }

    next
}

// =============================================================================
// Store
// =============================================================================

pub struct CartStore<S: Storage> {
    state: SessionState,
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Builds the initial state from `storage`. Absent keys take their
    /// defaults; unparsable ones are logged and also take their defaults.
    pub fn load(storage: S) -> Self {
        let dark_mode = match storage.get(DARK_MODE_KEY).as_deref() {
            None | Some("OFF") => false,
            Some("ON") => true,
            Some(other) => {
                warn!("Unreadable {DARK_MODE_KEY} value {other:?}, using default");
                false
            }
        };

        let state = SessionState {
            dark_mode,
            cart: Cart {
                cart_items: read_json(&storage, CART_ITEMS_KEY).unwrap_or_default(),
                shipping_address: read_json(&storage, SHIPPING_ADDRESS_KEY).unwrap_or_default(),
                payment_method: read_json(&storage, PAYMENT_METHOD_KEY),
            },
            user_info: read_json(&storage, USER_INFO_KEY),
        };

        Self { state, storage }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Applies `action` and writes the affected keys through to storage.
    pub fn dispatch(&mut self, action: Action) -> &SessionState {
        let next = reduce(&self.state, &action);
        persist(&mut self.storage, &action, &next);
        self.state = next;
        &self.state
    }

    pub fn into_parts(self) -> (SessionState, S) {
        (self.state, self.storage)
    }
}

fn read_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    serde_json::from_str(&raw)
        .map_err(|e| warn!("Unreadable {key} value ({e}), using default"))
        .ok()
}

fn write_json<T: Serialize>(storage: &mut impl Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => storage.set(key, json),
        Err(e) => warn!("Failed to persist {key}: {e}"),
    }
}

fn write_dark_mode(storage: &mut impl Storage, on: bool) {
    storage.set(DARK_MODE_KEY, if on { "ON" } else { "OFF" }.to_string());
}

/// Mirrors the keys touched by `action` from the post-transition `state`.
fn persist(storage: &mut impl Storage, action: &Action, state: &SessionState) {
    match action {
        Action::DarkModeOn | Action::DarkModeOff => write_dark_mode(storage, state.dark_mode),
        Action::CartAddItem(_) | Action::CartRemoveItem(_) => {
            write_json(storage, CART_ITEMS_KEY, &state.cart.cart_items)
        }
        Action::CartClear => storage.remove(CART_ITEMS_KEY),
        Action::SaveShippingAddress(_) | Action::SaveShippingAddressMapLocation(_) => {
            write_json(storage, SHIPPING_ADDRESS_KEY, &state.cart.shipping_address)
        }
        Action::SavePaymentMethod(_) => {
            write_json(storage, PAYMENT_METHOD_KEY, &state.cart.payment_method)
        }
        Action::UserLogin(_) => write_json(storage, USER_INFO_KEY, &state.user_info),
        Action::UserLogout => {
            for key in [
                USER_INFO_KEY,
                CART_ITEMS_KEY,
                SHIPPING_ADDRESS_KEY,
                PAYMENT_METHOD_KEY,
            ] {
                storage.remove(key);
            }
            write_dark_mode(storage, false);
        }
    }
}
