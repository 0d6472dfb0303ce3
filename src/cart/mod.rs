//! Shopping Cart Domain Module
//!
//! This module contains the client session store, including:
//! - Domain models (CartLine, ShippingAddress, SessionUser, SessionState)
//! - The Action sum type and the pure reducer
//! - Storage backends the store mirrors into (memory, cookies)
//! - REST API handlers

pub mod actions;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod storage;
pub mod store;

// Re-export commonly used types for convenience
pub use actions::Action;
pub use handlers::routes;
pub use storage::{CookieStorage, MemoryStorage, Storage};
pub use store::{reduce, CartStore};
