//! Admin console routes. Every handler requires [`AdminUser`].

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    catalog::models::{Product, ProductFields},
    checkout::round2,
    error::AppError,
    orders::{models::AdminOrderView, Order},
    state::SharedState,
    users::{models::AdminUserUpdate, AdminUser},
};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/admin/summary", get(summary))
        .route("/api/admin/orders", get(list_orders))
        .route(
            "/api/admin/products",
            get(list_products).post(create_product),
        )
        .route(
            "/api/admin/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/admin/users", get(list_users))
        .route(
            "/api/admin/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// Month as `YYYY-MM`
    #[serde(rename = "_id")]
    pub month: String,
    pub total_sales: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub orders_count: usize,
    pub products_count: u64,
    pub users_count: usize,
    pub orders_price: f64,
    pub sales_data: Vec<MonthlySales>,
}

/// Sales per calendar month of `created_at`, months ascending.
pub fn monthly_sales(orders: &[Order]) -> Vec<MonthlySales> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for order in orders {
        *months
            .entry(order.created_at.format("%Y-%m").to_string())
            .or_default() += order.totals.total_price;
    }

    months
        .into_iter()
        .map(|(month, total)| MonthlySales {
            month,
            total_sales: round2(total),
        })
        .collect()
}

/// Endpoint: GET /api/admin/summary
async fn summary(
    State(state): State<SharedState>,
    _admin: AdminUser,
) -> Result<Json<Summary>, AppError> {
    let orders = state.orders.all();

    Ok(Json(Summary {
        orders_count: orders.len(),
        products_count: state.products.count_all().await?,
        users_count: state.users.count(),
        orders_price: round2(orders.iter().map(|o| o.totals.total_price).sum()),
        sales_data: monthly_sales(&orders),
    }))
}

// =============================================================================
// Orders
// =============================================================================

/// Endpoint: GET /api/admin/orders
async fn list_orders(State(state): State<SharedState>, _admin: AdminUser) -> Json<Value> {
    let orders: Vec<AdminOrderView> = state
        .orders
        .all()
        .into_iter()
        .map(|order| AdminOrderView {
            user_name: state.users.get(&order.user).map(|u| u.name),
            order,
        })
        .collect();

    Json(json!({ "orders": orders }))
}

// =============================================================================
// Products
// =============================================================================

/// Endpoint: GET /api/admin/products
async fn list_products(
    State(state): State<SharedState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let products = state.products.all().await?;
    Ok(Json(json!({ "products": products })))
}

/// Endpoint: POST /api/admin/products
/// Creates a placeholder product for the admin to edit.
async fn create_product(
    State(state): State<SharedState>,
    _admin: AdminUser,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let product = state.products.insert(Product::sample()).await?;
    info!("Admin created product {}", product.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product Created", "product": product })),
    ))
}

/// Endpoint: GET /api/admin/products/:id
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _admin: AdminUser,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product"))
}

/// Endpoint: PUT /api/admin/products/:id
async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _admin: AdminUser,
    Json(fields): Json<ProductFields>,
) -> Result<Json<Value>, AppError> {
    let mut product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    product.apply(fields);

    let product = state
        .products
        .update(product)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    info!("Admin updated product {}", product.id);

    Ok(Json(
        json!({ "message": "Product Updated Successfully", "product": product }),
    ))
}

/// Endpoint: DELETE /api/admin/products/:id
async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    state
        .products
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    info!("Admin deleted product {id}");

    Ok(Json(json!({ "message": "Product Deleted" })))
}

// =============================================================================
// Users
// =============================================================================

/// Endpoint: GET /api/admin/users
async fn list_users(State(state): State<SharedState>, _admin: AdminUser) -> Json<Value> {
    Json(json!({ "users": state.users.all() }))
}

/// Endpoint: GET /api/admin/users/:id
async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .get(&id)
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(json!(user)))
}

/// Endpoint: PUT /api/admin/users/:id
async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _admin: AdminUser,
    Json(input): Json<AdminUserUpdate>,
) -> Result<Json<Value>, AppError> {
    let mut user = state
        .users
        .get(&id)
        .ok_or_else(|| AppError::not_found("User"))?;
    user.name = input.name;
    user.is_admin = input.is_admin;

    state
        .users
        .update(user)?
        .ok_or_else(|| AppError::not_found("User"))?;
    info!("Admin updated user {id}");

    Ok(Json(json!({ "message": "User Updated Successfully" })))
}

/// Endpoint: DELETE /api/admin/users/:id
async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AdminUser(claims): AdminUser,
) -> Result<Json<Value>, AppError> {
    if claims.id == id {
        return Err(AppError::BadRequest("Cannot delete your own account".into()));
    }

    state
        .users
        .remove(&id)
        .ok_or_else(|| AppError::not_found("User"))?;
    info!("Admin deleted user {id}");

    Ok(Json(json!({ "message": "User Deleted" })))
}
