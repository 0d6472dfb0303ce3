//! Integration tests for the storefront HTTP API
//!
//! These tests drive the full router in-process and cover:
//! - Faceted search and the filter options
//! - Registration, login and credential checks
//! - The cookie-backed cart session
//! - Checkout from session to order
//! - Admin authorization
//! - Store failures surfacing as 503

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use storefront::catalog::{
    filter::{DistinctField, ProductFilter, SortOrder},
    models::Product,
    ProductRepository,
};
use storefront::cart::storage::encode_cookie_value;
use storefront::config::Config;
use storefront::db::StoreError;
use storefront::router::create_app_router;
use storefront::seed::seed;
use storefront::state::AppState;

/// Helper function to create a test app with the sample catalog and accounts
async fn create_test_app() -> axum::Router {
    let state = AppState::new(Config::default());
    seed(&state).await.unwrap();
    create_app_router(Arc::new(state))
}

/// Cookies a browser would keep between requests
#[derive(Default)]
struct CookieJar(HashMap<String, String>);

impl CookieJar {
    fn absorb(&mut self, headers: &HeaderMap) {
        for set_cookie in headers.get_all(header::SET_COOKIE) {
            let raw = set_cookie.to_str().unwrap();
            let pair = raw.split(';').next().unwrap();
            let (key, value) = pair.split_once('=').unwrap();
            if value.is_empty() {
                self.0.remove(key);
            } else {
                self.0.insert(key.to_string(), value.to_string());
            }
        }
    }

    fn header(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Helper function to send a request and get the response
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
    jar: Option<&mut CookieJar>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(jar) = jar.as_ref() {
        builder = builder.header(header::COOKIE, jar.header());
    }

    let body = match body {
        Some(body) => Body::from(serde_json::to_string(&body).unwrap()),
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    if let Some(jar) = jar {
        jar.absorb(response.headers());
    }

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None, None).await
}

async fn login(app: &axum::Router, email: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/users/login",
        Some(json!({ "email": email, "password": "123456" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn names(body: &Value) -> Vec<&str> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_paginates_whole_catalog() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/api/search?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countProducts"], 6);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["page"], 2);
    // Default order is newest insertion first, so page 2 holds the first three seeded.
    assert_eq!(names(&body), vec!["Slim Shirt", "Fit Shirt", "Free Shirt"]);
    assert!(body["products"][0].get("reviews").is_none());
}

#[tokio::test]
async fn test_search_combines_facets() {
    let app = create_test_app().await;

    let (_, body) = get(&app, "/api/search?category=Shirts&sort=lowest&pageSize=10").await;
    assert_eq!(names(&body), vec!["Free Shirt", "Slim Shirt", "Fit Shirt"]);
    assert_eq!(body["categories"], json!(["Pants", "Shirts"]));

    let (_, body) = get(&app, "/api/search?price=51-100&rating=4&sort=highest&pageSize=10").await;
    assert_eq!(
        names(&body),
        vec!["Fit Shirt", "Golf Pants", "Slim Shirt", "Fit Pants"]
    );

    let (_, body) = get(&app, "/api/search?query=PANTS&brand=Adidas").await;
    assert_eq!(names(&body), vec!["Fit Pants"]);
}

#[tokio::test]
async fn test_search_ignores_malformed_facets() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/api/search?price=cheap&rating=high&page=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countProducts"], 6);
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn test_search_options() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/api/search/options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["brands"],
        json!(["Adidas", "Calvin Klein", "Hugo Boss", "Lacoste", "Nike", "Ralph Lauren"])
    );
    assert_eq!(body["ratings"], json!([1, 2, 3, 4, 5]));
    assert_eq!(body["prices"][0], json!({ "name": "$1 to $50", "value": "1-50" }));
}

#[tokio::test]
async fn test_product_by_slug() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/api/products/slug/golf-pants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brand"], "Hugo Boss");

    let (status, body) = get(&app, "/api/products/slug/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product Not Found");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = create_test_app().await;
    let user = json!({ "name": "Sam", "email": "sam@example.com", "password": "secret" });

    let (status, body) = send(&app, "POST", "/api/users/register", Some(user.clone()), None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isAdmin"], false);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, _) = send(&app, "POST", "/api/users/register", Some(user), None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/login",
        Some(json!({ "email": "sam@example.com", "password": "wrong" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid Email or Password");
}

#[tokio::test]
async fn test_protected_routes_check_credentials() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/api/admin/summary").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not supplied");

    let (status, body) = send(&app, "GET", "/api/orders/history", None, Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");

    let jane = login(&app, "user@example.com").await;
    let token = jane["token"].as_str().unwrap();
    let (status, body) = send(&app, "GET", "/api/admin/summary", None, Some(token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User is not admin");

    let john = login(&app, "admin@example.com").await;
    let token = john["token"].as_str().unwrap();
    let (status, body) = send(&app, "GET", "/api/admin/summary", None, Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productsCount"], 6);
    assert_eq!(body["usersCount"], 2);
    assert_eq!(body["ordersCount"], 0);
}

// =============================================================================
// Cart session
// =============================================================================

#[tokio::test]
async fn test_cart_session_lives_in_cookies() {
    let app = create_test_app().await;
    let mut jar = CookieJar::default();

    let (_, product) = get(&app, "/api/products/slug/fit-shirt").await;
    let id = product["_id"].as_str().unwrap();

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({ "productId": id })),
            None,
            Some(&mut jar),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, session) = send(&app, "GET", "/api/session", None, None, Some(&mut jar)).await;
    assert_eq!(session["cart"]["cartItems"][0]["quantity"], 2);
    assert_eq!(session["cart"]["cartItems"][0]["price"], 98.0);

    let (status, body) = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": id, "quantity": 21 })),
        None,
        Some(&mut jar),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("not enough"));

    let (_, session) = send(
        &app,
        "DELETE",
        &format!("/api/cart/items/{id}"),
        None,
        None,
        Some(&mut jar),
    )
    .await;
    assert_eq!(session["cart"]["cartItems"], json!([]));
}

#[tokio::test]
async fn test_session_actions() {
    let app = create_test_app().await;
    let mut jar = CookieJar::default();

    let (status, session) = send(
        &app,
        "POST",
        "/api/session/actions",
        Some(json!({ "type": "DARK_MODE_ON" })),
        None,
        Some(&mut jar),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["darkMode"], true);

    let (status, session) = send(
        &app,
        "POST",
        "/api/session/actions",
        Some(json!({ "type": "SOMETHING_ELSE", "payload": 1 })),
        None,
        Some(&mut jar),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["darkMode"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/session/actions",
        Some(json!({ "type": "SAVE_PAYMENT_METHOD", "payload": "Bitcoin" })),
        None,
        Some(&mut jar),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, session) = send(&app, "GET", "/api/session", None, None, Some(&mut jar)).await;
    assert_eq!(session["darkMode"], true);
    assert_eq!(session["cart"]["paymentMethod"], Value::Null);
}

#[tokio::test]
async fn test_add_item_with_maxed_out_cookie_quantity() {
    let app = create_test_app().await;
    let (_, product) = get(&app, "/api/products/slug/fit-shirt").await;
    let id = product["_id"].as_str().unwrap();

    let line = json!([{ "_id": id, "name": "Fit Shirt", "price": 98.0, "quantity": u32::MAX }]);
    let mut jar = CookieJar::default();
    jar.0.insert(
        "cartItems".into(),
        encode_cookie_value(&line.to_string()),
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": id })),
        None,
        Some(&mut jar),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("not enough"));
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let app = create_test_app().await;
    let mut jar = CookieJar::default();

    let (_, product) = get(&app, "/api/products/slug/golf-pants").await;
    send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": product["_id"], "quantity": 3 })),
        None,
        Some(&mut jar),
    )
    .await;

    let (_, progress) = send(&app, "GET", "/api/checkout", None, None, Some(&mut jar)).await;
    assert_eq!(progress["step"], "login");

    let user = login(&app, "user@example.com").await;
    let token = user["token"].as_str().unwrap().to_string();

    // Too early: no shipping address yet.
    let (status, _) = send(&app, "POST", "/api/checkout", None, Some(&token), Some(&mut jar)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for action in [
        json!({ "type": "USER_LOGIN", "payload": user }),
        json!({
            "type": "SAVE_SHIPPING_ADDRESS",
            "payload": {
                "fullName": "Jane Doe",
                "address": "123 Main St",
                "city": "Springfield",
                "postalCode": "62704",
                "country": "USA"
            }
        }),
        json!({ "type": "SAVE_PAYMENT_METHOD", "payload": "PayPal" }),
    ] {
        let (status, _) = send(&app, "POST", "/api/session/actions", Some(action), None, Some(&mut jar)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, progress) = send(&app, "GET", "/api/checkout", None, None, Some(&mut jar)).await;
    assert_eq!(progress["step"], "placeOrder");
    // 3 x 82 = 246, ships free, 24.60 tax.
    assert_eq!(progress["totals"]["totalPrice"], 270.6);
    assert_eq!(progress["totalLabel"], "$270.60");

    let (status, body) = send(&app, "POST", "/api/checkout", None, Some(&token), Some(&mut jar)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["itemsPrice"], 246.0);
    assert_eq!(body["session"]["cart"]["cartItems"], json!([]));
    assert_eq!(body["session"]["cart"]["paymentMethod"], "PayPal");

    let (_, session) = send(&app, "GET", "/api/session", None, None, Some(&mut jar)).await;
    assert_eq!(session["cart"]["cartItems"], json!([]));

    let (_, history) = send(&app, "GET", "/api/orders/history", None, Some(&token), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let order_id = body["order"]["_id"].as_str().unwrap();
    let (status, paid) = send(
        &app,
        "PUT",
        &format!("/api/orders/{order_id}/pay"),
        Some(json!({ "id": "PAY-1", "status": "COMPLETED", "email_address": "jane@example.com" })),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["order"]["isPaid"], true);
    assert_eq!(paid["order"]["paymentResult"]["status"], "COMPLETED");

    // Another customer cannot see it.
    let (_, other) = send(
        &app,
        "POST",
        "/api/users/register",
        Some(json!({ "name": "Eve", "email": "eve@example.com", "password": "pw" })),
        None,
        None,
    )
    .await;
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/orders/{order_id}"),
        None,
        other["token"].as_str(),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_rejects_token_of_another_user() {
    let app = create_test_app().await;
    let mut jar = CookieJar::default();

    let (_, product) = get(&app, "/api/products/slug/fit-shirt").await;
    send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": product["_id"], "quantity": 1 })),
        None,
        Some(&mut jar),
    )
    .await;

    let customer = login(&app, "user@example.com").await;
    for action in [
        json!({ "type": "USER_LOGIN", "payload": customer }),
        json!({
            "type": "SAVE_SHIPPING_ADDRESS",
            "payload": {
                "fullName": "Jane Doe",
                "address": "123 Main St",
                "city": "Springfield",
                "postalCode": "62704",
                "country": "USA"
            }
        }),
        json!({ "type": "SAVE_PAYMENT_METHOD", "payload": "Stripe" }),
    ] {
        send(&app, "POST", "/api/session/actions", Some(action), None, Some(&mut jar)).await;
    }

    let admin = login(&app, "admin@example.com").await;
    let (status, body) = send(&app, "POST", "/api/checkout", None, admin["token"].as_str(), Some(&mut jar)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session belongs to another user");

    // Nothing was placed and the cart survives.
    let (_, orders) = send(&app, "GET", "/api/orders/history", None, admin["token"].as_str(), None).await;
    assert_eq!(orders, json!([]));
    let (_, session) = send(&app, "GET", "/api/session", None, None, Some(&mut jar)).await;
    assert_eq!(session["cart"]["cartItems"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", "/api/checkout", None, customer["token"].as_str(), Some(&mut jar)).await;
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// Store failures
// =============================================================================

struct UnavailableRepository;

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn find(
        &self,
        _: &ProductFilter,
        _: SortOrder,
        _: usize,
        _: usize,
    ) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn count(&self, _: &ProductFilter) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn distinct(&self, _: DistinctField) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_id(&self, _: &str) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_slug(&self, _: &str) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert(&self, _: Product) -> Result<Product, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn update(&self, _: Product) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _: &str) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_unavailable_store_is_503() {
    let state = AppState::with_products(Config::default(), Arc::new(UnavailableRepository));
    let app = create_app_router(Arc::new(state));

    let (status, body) = get(&app, "/api/search?category=Shirts").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].as_str().unwrap().contains("connection refused"));

    let (status, _) = get(&app, "/api/products").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
