//! Admin Domain Module
//!
//! Dashboard summary and catalog, order and account management for users
//! whose credential carries the admin flag.

pub mod handlers;

pub use handlers::routes;
