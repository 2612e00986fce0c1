//! Cache types for backend list responses.

use super::types::{Customer, Item};

/// Cache key for the two cached list resources. Orders are never cached;
/// correctness for mutations relies on re-fetching them.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Customers,
    Items,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Customers(Vec<Customer>),
    Items(Vec<Item>),
}
