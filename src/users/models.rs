//! User Domain Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{new_id, Document};

/// A registered account. The password hash is never serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, is_admin: bool) -> Self {
        Self {
            id: new_id(),
            name,
            email,
            password_hash,
            is_admin,
            created_at: Utc::now(),
        }
    }
}

/// Body of `POST /api/users/register`
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/users/login`
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /api/users/profile`. An empty or missing password keeps the old one.
#[derive(Debug, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
}

/// Body of `PUT /api/admin/users/:id`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdate {
    pub name: String,
    pub is_admin: bool,
}
