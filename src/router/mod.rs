//! Routing module for the storefront

use axum::{body::Body, extract::Request, middleware::Next, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::state::SharedState;

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: Log requests
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        let (method, uri) = (req.method().clone(), req.uri().clone());
        info!("REQ: {method} {uri}");
        let res = next.run(req).await;
        if !res.status().is_success() {
            warn!("RES: {method} {uri} -> {}", res.status());
        }
        res
    });

    // Middleware: CORS (Permissive for local dev)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes
    Router::new()
        .merge(crate::catalog::routes())
        .merge(crate::cart::routes())
        .merge(crate::checkout::routes())
        .merge(crate::orders::routes())
        .merge(crate::users::routes())
        .merge(crate::admin::routes())
        .layer(log_layer)
        .layer(cors_layer)
        .with_state(state)
}
