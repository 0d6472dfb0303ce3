//! REST API handlers for cart and session operations
//!
//! Each request rebuilds the cart store from the request cookies, applies at
//! most one action, and answers with the resulting state plus `Set-Cookie`
//! headers for whatever the store persisted.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, info};

use super::{
    actions::{Action, ItemRef},
    helpers::ensure_in_stock,
    models::{AddItemInput, CartLine},
    storage::CookieStorage,
    store::CartStore,
};
use crate::{error::AppError, state::SharedState};

/// Creates routes for cart and session operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/session/actions", post(dispatch_action))
        .route("/api/cart/items", post(add_item))
        .route("/api/cart/items/:id", delete(remove_item))
}

/// Loads the session store backed by the request's cookies.
pub fn session_store(headers: &HeaderMap) -> CartStore<CookieStorage> {
    CartStore::load(CookieStorage::from_headers(headers))
}

/// Serializes the current state and attaches the pending cookie writes.
pub fn session_response(store: CartStore<CookieStorage>) -> Response {
    let (state, storage) = store.into_parts();
    let mut response = Json(state).into_response();
    storage.write_to(response.headers_mut());
    response
}

/// Endpoint: GET /api/session
async fn get_session(headers: HeaderMap) -> Response {
    session_response(session_store(&headers))
}

/// Endpoint: POST /api/session/actions
/// Dispatches a raw action. Unknown action kinds leave the state unchanged.
async fn dispatch_action(
    headers: HeaderMap,
    Json(raw): Json<Value>,
) -> Result<Response, AppError> {
    let mut store = session_store(&headers);

    match Action::from_raw(raw).map_err(|e| AppError::BadRequest(format!("Invalid action: {e}")))? {
        Some(action) => {
            debug!("Dispatching session action {action:?}");
            store.dispatch(action);
        }
        None => debug!("Ignoring unknown session action"),
    }

    Ok(session_response(store))
}

/// Endpoint: POST /api/cart/items
/// Checks stock against the catalog, then dispatches `CART_ADD_ITEM`.
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<AddItemInput>,
) -> Result<Response, AppError> {
    let product = state
        .products
        .find_by_id(&input.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    let mut store = session_store(&headers);
    let quantity = match input.quantity {
        Some(quantity) => quantity,
        // The current quantity comes from the client's cookie.
        None => store
            .state()
            .cart
            .cart_items
            .iter()
            .find(|line| line.id == product.id)
            .map_or(0, |line| line.quantity)
            .saturating_add(1),
    };

    ensure_in_stock(&product, quantity)?;

    info!("Cart: {}x {}", quantity, product.name);
    store.dispatch(Action::CartAddItem(CartLine::from_product(&product, quantity)));

    Ok(session_response(store))
}

/// Endpoint: DELETE /api/cart/items/:id
async fn remove_item(Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut store = session_store(&headers);
    store.dispatch(Action::CartRemoveItem(ItemRef { id }));
    session_response(store)
}
