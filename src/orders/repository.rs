use super::models::Order;
use crate::db::{Collection, StoreError};

#[derive(Default)]
pub struct OrderRepository {
    orders: Collection<Order>,
}

impl OrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order) -> Result<Order, StoreError> {
        self.orders.insert(order)
    }

    pub fn get(&self, id: &str) -> Option<Order> {
        self.orders.get(id)
    }

    pub fn update(&self, order: Order) -> Result<Option<Order>, StoreError> {
        self.orders.replace(order)
    }

    /// Orders placed by `user`, newest first.
    pub fn for_user(&self, user: &str) -> Vec<Order> {
        let mut orders = self.orders.find(|o| o.user == user);
        orders.reverse();
        orders
    }

    /// Every order, oldest first.
    pub fn all(&self) -> Vec<Order> {
        self.orders.all()
    }

    pub fn count(&self) -> usize {
        self.orders.len()
    }
}
