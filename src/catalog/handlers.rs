//! Public catalog routes: listing, search, product details and reviews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::{
    filter::{DistinctField, PRICE_BUCKETS, RATING_FLOORS},
    models::{Product, Review, ReviewInput},
    search::{search, SearchParams, SearchQuery, SearchResult},
};
use crate::{error::AppError, state::SharedState, users::AuthUser};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/search", get(search_products))
        .route("/api/search/options", get(search_options))
        .route("/api/products", get(list_products))
        .route("/api/products/categories", get(list_categories))
        .route("/api/products/slug/:slug", get(product_by_slug))
        .route("/api/products/:id", get(product_by_id))
        .route(
            "/api/products/:id/reviews",
            get(list_reviews).post(add_review),
        )
}

/// Endpoint: GET /api/search
async fn search_products(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResult>, AppError> {
    let params = SearchParams::from_query(&query, state.config.page_size, state.config.max_page_size);
    Ok(Json(search(state.products.as_ref(), &params).await?))
}

#[derive(Serialize)]
struct PriceOption {
    name: &'static str,
    value: &'static str,
}

/// Endpoint: GET /api/search/options
/// Everything the filter sidebar offers, computed over the whole catalog.
async fn search_options(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    let categories = state.products.distinct(DistinctField::Category).await?;
    let brands = state.products.distinct(DistinctField::Brand).await?;
    let prices: Vec<PriceOption> = PRICE_BUCKETS
        .iter()
        .map(|&(name, value)| PriceOption { name, value })
        .collect();

    Ok(Json(json!({
        "categories": categories,
        "brands": brands,
        "prices": prices,
        "ratings": RATING_FLOORS,
    })))
}

/// Endpoint: GET /api/products
/// The whole catalog in insertion order.
async fn list_products(State(state): State<SharedState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.all().await?))
}

/// Endpoint: GET /api/products/categories
async fn list_categories(State(state): State<SharedState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(
        state.products.distinct(DistinctField::Category).await?,
    ))
}

/// Endpoint: GET /api/products/:id
async fn product_by_id(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product"))
}

/// Endpoint: GET /api/products/slug/:slug
async fn product_by_slug(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .find_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product"))
}

/// Endpoint: GET /api/products/:id/reviews
async fn list_reviews(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    state
        .products
        .find_by_id(&id)
        .await?
        .map(|p| Json(p.reviews))
        .ok_or_else(|| AppError::not_found("Product"))
}

/// Endpoint: POST /api/products/:id/reviews
/// A user's later review replaces their earlier one.
async fn add_review(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AuthUser(claims): AuthUser,
    Json(input): Json<ReviewInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if !(1.0..=5.0).contains(&input.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }

    let mut product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    product.upsert_review(Review {
        user: claims.id,
        name: claims.name,
        rating: input.rating,
        comment: input.comment,
        created_at: Utc::now(),
    });

    let product = state
        .products
        .update(product)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    info!(
        "Review saved for {}: {} review(s), rating {:.2}",
        product.id, product.num_reviews, product.rating
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review submitted",
            "numReviews": product.num_reviews,
            "rating": product.rating,
        })),
    ))
}
