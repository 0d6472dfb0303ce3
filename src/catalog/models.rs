//! Catalog Domain Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{new_id, Document};

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Id of the reviewing user
    pub user: String,
    pub name: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A catalog entry, including its reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub price: f64,
    pub brand: String,
    pub rating: f64,
    pub num_reviews: u32,
    pub count_in_stock: u32,
    pub description: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Product {
    /// Builds a product with a fresh id and no reviews.
    pub fn new(fields: ProductFields) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: fields.name,
            slug: fields.slug,
            category: fields.category,
            image: fields.image,
            price: fields.price,
            brand: fields.brand,
            rating: 0.0,
            num_reviews: 0,
            count_in_stock: fields.count_in_stock,
            description: fields.description,
            is_featured: fields.is_featured,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Placeholder product created from the admin console, to be edited afterwards.
    pub fn sample() -> Self {
        let mut product = Self::new(ProductFields {
            name: "sample name".into(),
            slug: String::new(),
            category: "sample category".into(),
            image: "/images/shirt1.jpg".into(),
            price: 0.0,
            brand: "sample brand".into(),
            count_in_stock: 0,
            description: "sample description".into(),
            is_featured: false,
        });
        product.slug = format!("sample-slug-{}", product.id);
        product
    }

    /// Overwrites the editable fields, leaving id, reviews and rating alone.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.slug = fields.slug;
        self.category = fields.category;
        self.image = fields.image;
        self.price = fields.price;
        self.brand = fields.brand;
        self.count_in_stock = fields.count_in_stock;
        self.description = fields.description;
        self.is_featured = fields.is_featured;
        self.updated_at = Utc::now();
    }

    /// Adds or replaces `review` (one per user) and recomputes the aggregate rating.
    pub fn upsert_review(&mut self, review: Review) {
        match self.reviews.iter_mut().find(|r| r.user == review.user) {
            Some(existing) => *existing = review,
            None => self.reviews.push(review),
        }

        self.num_reviews = self.reviews.len() as u32;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            self.reviews.iter().map(|r| r.rating).sum::<f64>() / self.reviews.len() as f64
        };
        self.updated_at = Utc::now();
    }
}

/// Editable product fields, as submitted by the admin console.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub price: f64,
    pub brand: String,
    pub count_in_stock: u32,
    pub description: String,
    #[serde(default)]
    pub is_featured: bool,
}

/// A product as it appears in listing payloads: everything except reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListedProduct {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub price: f64,
    pub brand: String,
    pub rating: f64,
    pub num_reviews: u32,
    pub count_in_stock: u32,
    pub description: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ListedProduct {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            category: p.category,
            image: p.image,
            price: p.price,
            brand: p.brand,
            rating: p.rating,
            num_reviews: p.num_reviews,
            count_in_stock: p.count_in_stock,
            description: p.description,
            is_featured: p.is_featured,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body of `POST /api/products/:id/reviews`
#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub rating: f64,
    pub comment: String,
}
