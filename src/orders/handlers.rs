//! REST API handlers for orders

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use super::models::{Order, PaymentResult, PlaceOrderInput};
use crate::{
    error::AppError,
    state::{AppState, SharedState},
    users::{AdminUser, AuthUser},
};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/history", get(order_history))
        .route("/api/orders/:id", get(order_by_id))
        .route("/api/orders/:id/pay", put(pay_order))
        .route("/api/orders/:id/deliver", put(deliver_order))
}

/// Validates and stores a new order for `user`.
pub fn place_order(
    state: &AppState,
    user: &str,
    input: PlaceOrderInput,
) -> Result<Order, AppError> {
    if input.order_items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".into()));
    }
    if let Some(item) = input.order_items.iter().find(|i| i.quantity == 0) {
        return Err(AppError::BadRequest(format!(
            "Quantity for {} must be at least 1",
            item.name
        )));
    }

    let order = state.orders.insert(Order::new(user.to_string(), input))?;
    info!(
        "Order {} placed by {}: {} line(s), total {}",
        order.id,
        user,
        order.order_items.len(),
        order.totals.total_price
    );
    Ok(order)
}

/// Looks up an order the caller may see: their own, or any if admin.
fn visible_order(state: &AppState, id: &str, caller: &AuthUser) -> Result<Order, AppError> {
    let AuthUser(claims) = caller;
    state
        .orders
        .get(id)
        .filter(|o| claims.is_admin || o.user == claims.id)
        .ok_or_else(|| AppError::not_found("Order"))
}

/// Endpoint: POST /api/orders
async fn create_order(
    State(state): State<SharedState>,
    AuthUser(claims): AuthUser,
    Json(input): Json<PlaceOrderInput>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = place_order(&state, &claims.id, input)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Endpoint: GET /api/orders/history
async fn order_history(
    State(state): State<SharedState>,
    AuthUser(claims): AuthUser,
) -> Json<Vec<Order>> {
    Json(state.orders.for_user(&claims.id))
}

/// Endpoint: GET /api/orders/:id
async fn order_by_id(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<Json<Order>, AppError> {
    visible_order(&state, &id, &user).map(Json)
}

/// Endpoint: PUT /api/orders/:id/pay
async fn pay_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    user: AuthUser,
    Json(result): Json<PaymentResult>,
) -> Result<Json<Value>, AppError> {
    let mut order = visible_order(&state, &id, &user)?;
    order.mark_paid(result);

    let order = state
        .orders
        .update(order)?
        .ok_or_else(|| AppError::not_found("Order"))?;
    info!("Order {} paid", order.id);

    Ok(Json(json!({
        "message": "Order has been successfully Paid",
        "order": order,
    })))
}

/// Endpoint: PUT /api/orders/:id/deliver
async fn deliver_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let mut order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::not_found("Order"))?;
    order.mark_delivered();

    let order = state
        .orders
        .update(order)?
        .ok_or_else(|| AppError::not_found("Order"))?;
    info!("Order {} delivered", order.id);

    Ok(Json(json!({
        "message": "Order delivered",
        "order": order,
    })))
}
