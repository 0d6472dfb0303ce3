//! Storefront Library
//!
//! This library provides the core of a clothing storefront: a client
//! session store for the cart, a faceted catalog search engine, checkout
//! and orders, accounts and the admin console, served over HTTP.

// Domain modules
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod users;

// Infrastructure
pub mod config;
pub mod db;
pub mod error;
pub mod router;
pub mod seed;
pub mod state;
