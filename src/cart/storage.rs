//! Durable key-value storage mirrored by the cart store.
//!
//! [`CookieStorage`] reads the request's `Cookie` header and turns writes
//! into `Set-Cookie` headers on the response. Values are JSON strings
//! encoded as URL-safe base64 so they survive cookie syntax.

use std::collections::HashMap;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tracing::warn;

pub const DARK_MODE_KEY: &str = "darkMode";
pub const CART_ITEMS_KEY: &str = "cartItems";
pub const SHIPPING_ADDRESS_KEY: &str = "shippingAddress";
pub const PAYMENT_METHOD_KEY: &str = "paymentMethod";
pub const USER_INFO_KEY: &str = "userInfo";

pub const SESSION_KEYS: [&str; 5] = [
    DARK_MODE_KEY,
    CART_ITEMS_KEY,
    SHIPPING_ADDRESS_KEY,
    PAYMENT_METHOD_KEY,
    USER_INFO_KEY,
];

/// String key-value storage. Writes are best-effort and never fail.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CookieWrite {
    Set(String, String),
    Remove(String),
}

impl CookieWrite {
    fn key(&self) -> &str {
        match self {
            CookieWrite::Set(key, _) | CookieWrite::Remove(key) => key,
        }
    }

    fn header_value(&self) -> String {
        match self {
            CookieWrite::Set(key, value) => format!(
                "{key}={}; Path=/; SameSite=Lax",
                URL_SAFE_NO_PAD.encode(value)
            ),
            CookieWrite::Remove(key) => format!("{key}=; Path=/; Max-Age=0"),
        }
    }
}

/// Session keys read from a request, with pending writes for the response.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    entries: HashMap<String, String>,
    writes: Vec<CookieWrite>,
}

impl CookieStorage {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut entries = HashMap::new();

        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='));

        for (key, encoded) in pairs {
            if !SESSION_KEYS.contains(&key) {
                continue;
            }
            let decoded = URL_SAFE_NO_PAD
                .decode(encoded)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok());
            match decoded {
                Some(value) => {
                    entries.insert(key.to_string(), value);
                }
                None => warn!("Ignoring undecodable {key} cookie"),
            }
        }

        Self {
            entries,
            writes: Vec::new(),
        }
    }

    /// Appends one `Set-Cookie` header per key written since construction.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        for write in &self.writes {
            match HeaderValue::from_str(&write.header_value()) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => warn!("Skipping {} cookie write: {e}", write.key()),
            }
        }
    }

    fn record(&mut self, write: CookieWrite) {
        self.writes.retain(|w| w.key() != write.key());
        self.writes.push(write);
    }
}

impl Storage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value.clone());
        self.record(CookieWrite::Set(key.to_string(), value));
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.record(CookieWrite::Remove(key.to_string()));
    }
}

/// Encodes a stored value the way [`CookieStorage`] writes it, for building
/// `Cookie` request headers.
pub fn encode_cookie_value(value: &str) -> String {
    URL_SAFE_NO_PAD.encode(value)
}
