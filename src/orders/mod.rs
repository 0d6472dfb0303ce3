//! Orders Domain Module
//!
//! Placed orders, their payment and delivery lifecycle, and the routes a
//! signed-in customer uses to place and review them.

pub mod handlers;
pub mod models;
pub mod repository;

pub use handlers::{place_order, routes};
pub use models::{Order, OrderItem, PaymentResult, PlaceOrderInput};
pub use repository::OrderRepository;
