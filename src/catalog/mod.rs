//! Catalog Domain Module
//!
//! Products and reviews, the facet predicates used to query them, the
//! product repository seam and the faceted search engine.

pub mod filter;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod search;

pub use handlers::routes;
pub use repository::{MemoryProductRepository, ProductRepository};
pub use search::{search, SearchParams, SearchQuery, SearchResult};
