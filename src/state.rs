//! Application State
//!
//! Repositories, configuration and the credential issuer shared by every
//! request handler.

use std::sync::Arc;

use tracing::info;

use crate::{
    catalog::{MemoryProductRepository, ProductRepository},
    config::Config,
    orders::OrderRepository,
    users::{TokenIssuer, UserRepository},
};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,

    /// The catalog sits behind a trait so a different document store can be
    /// swapped in without touching the search engine.
    pub products: Arc<dyn ProductRepository>,

    pub orders: OrderRepository,
    pub users: UserRepository,
    pub tokens: TokenIssuer,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Creates a new AppState with empty in-memory collections
    pub fn new(config: Config) -> Self {
        Self::with_products(config, Arc::new(MemoryProductRepository::new()))
    }

    pub fn with_products(config: Config, products: Arc<dyn ProductRepository>) -> Self {
        info!(
            "Credentials expire after {} day(s); search pages hold {} product(s)",
            config.token_ttl_days, config.page_size
        );

        Self {
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_days),
            products,
            orders: OrderRepository::new(),
            users: UserRepository::new(),
            config,
        }
    }
}
