//! Checkout Domain Module
//!
//! Order pricing, the step machine that drives the checkout wizard and the
//! route that turns a ready session into an order.

pub mod handlers;
pub mod pricing;
pub mod steps;

pub use handlers::routes;
pub use pricing::{format_usd, round2, OrderTotals};
pub use steps::CheckoutStep;
