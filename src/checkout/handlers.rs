//! Checkout route handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use super::{pricing::format_usd, steps::CheckoutStep, OrderTotals};
use crate::{
    cart::{
        handlers::session_store,
        helpers::format_item_summary,
        models::{Cart, SessionState},
        Action,
    },
    error::AppError,
    orders::{place_order, Order, OrderItem, PlaceOrderInput},
    state::SharedState,
    users::AuthUser,
};

pub fn routes() -> Router<SharedState> {
    Router::new().route("/api/checkout", get(checkout_status).post(checkout))
}

fn cart_totals(cart: &Cart) -> OrderTotals {
    OrderTotals::from_lines(cart.cart_items.iter().map(|l| (l.price, l.quantity)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutStatus {
    step: CheckoutStep,
    totals: OrderTotals,
    total_label: String,
}

/// Endpoint: GET /api/checkout
/// Where the cookie session stands in the checkout wizard.
async fn checkout_status(headers: HeaderMap) -> Json<CheckoutStatus> {
    let store = session_store(&headers);
    let session = store.state();
    let totals = cart_totals(&session.cart);

    Json(CheckoutStatus {
        step: CheckoutStep::for_session(session),
        total_label: format_usd(totals.total_price),
        totals,
    })
}

#[derive(Serialize)]
struct CheckoutResult {
    order: Order,
    session: SessionState,
}

/// Endpoint: POST /api/checkout
/// Places an order from the cookie session, then clears the cart.
async fn checkout(
    State(state): State<SharedState>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let mut store = session_store(&headers);

    // The cookie session must belong to the bearer of the token.
    if let Some(session_user) = &store.state().user_info {
        if session_user.id != claims.id {
            warn!(
                "Checkout rejected: session user {} does not match token user {}",
                session_user.id, claims.id
            );
            return Err(AppError::Unauthorized(
                "Session belongs to another user".into(),
            ));
        }
    }

    let step = CheckoutStep::for_session(store.state());
    if step != CheckoutStep::PlaceOrder {
        return Err(AppError::BadRequest(step.missing().into()));
    }

    let cart = &store.state().cart;
    let summary = format_item_summary(&cart.cart_items);
    let input = PlaceOrderInput {
        order_items: cart.cart_items.iter().cloned().map(OrderItem::from).collect(),
        shipping_address: cart.shipping_address.clone(),
        payment_method: match cart.payment_method {
            Some(method) => method,
            None => return Err(AppError::BadRequest(CheckoutStep::Payment.missing().into())),
        },
    };

    let order = place_order(&state, &claims.id, input)?;
    info!("CHECKOUT: order {} - {}", order.id, summary);

    store.dispatch(Action::CartClear);
    let (session, storage) = store.into_parts();

    let mut response = (StatusCode::CREATED, Json(CheckoutResult { order, session })).into_response();
    storage.write_to(response.headers_mut());
    Ok(response)
}
