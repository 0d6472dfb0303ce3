//! Users Domain Module
//!
//! Accounts, password hashing, signed session credentials and the
//! `AuthUser`/`AdminUser` request extractors.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;

pub use auth::{AdminUser, AuthUser, TokenIssuer};
pub use handlers::routes;
pub use repository::UserRepository;
