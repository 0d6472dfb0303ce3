use super::models::User;
use crate::db::{Collection, StoreError};

fn email_key(user: &User) -> String {
    user.email.to_lowercase()
}

/// User accounts, unique by email (ignoring case).
pub struct UserRepository {
    users: Collection<User>,
}

impl Default for UserRepository {
    fn default() -> Self {
        Self {
            users: Collection::with_unique_key(email_key),
        }
    }
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) -> Result<User, StoreError> {
        self.users.insert(user)
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.users.get(id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.get_by_key(&email.to_lowercase())
    }

    /// Saves changes to an existing user; `None` if the id is unknown.
    pub fn update(&self, user: User) -> Result<Option<User>, StoreError> {
        self.users.replace(user)
    }

    pub fn remove(&self, id: &str) -> Option<User> {
        self.users.remove(id)
    }

    pub fn all(&self) -> Vec<User> {
        self.users.all()
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }
}
