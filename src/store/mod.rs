use async_trait::async_trait;

use crate::domain::{Buyer, Order, OrderItem, Product, Review, Seller, User};

// Private module declarations
#[cfg(test)]
mod memory;
mod postgres;

// Re-export for public API
#[cfg(test)]
pub use memory::InMemoryStore;
pub use postgres::PgEntityStore;

// ============================================================================
// Entity Store - Read Interface
// ============================================================================
//
// The aggregation service reads marketplace entities through this trait and
// never writes. Every method is a point lookup, a foreign-key scan, a batched
// id lookup, or a count; there are no cross-entity joins here, the service
// owns the shaping.
//
// Contract for implementations:
// - A missing row is Ok(None) or an empty Vec, never an error.
// - Multi-row results are ordered by ascending id, so repeated reads over
//   unchanged data produce identical output.
// - Batched lookups treat an empty id slice as an empty result.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database failure (connection, query, or row decode).
    #[error("entity store query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError>;

    async fn buyer_by_id(&self, buyer_id: i64) -> Result<Option<Buyer>, StoreError>;

    async fn buyers_by_ids(&self, ids: &[i64]) -> Result<Vec<Buyer>, StoreError>;

    /// The buyer profile wrapping `user_id`, if the user has one.
    async fn buyer_by_user_id(&self, user_id: i64) -> Result<Option<Buyer>, StoreError>;

    async fn seller_by_id(&self, seller_id: i64) -> Result<Option<Seller>, StoreError>;

    /// The seller profile wrapping `user_id`, if the user has one.
    async fn seller_by_user_id(&self, user_id: i64) -> Result<Option<Seller>, StoreError>;

    async fn products_by_seller(&self, seller_id: i64) -> Result<Vec<Product>, StoreError>;

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StoreError>;

    async fn orders_by_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, StoreError>;

    async fn orders_by_ids(&self, ids: &[i64]) -> Result<Vec<Order>, StoreError>;

    /// Line items of one order, in insertion order.
    async fn order_items_by_order(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError>;

    /// Every line item referencing one of the given products, across all
    /// orders. This is how a seller's share of the order book is located.
    async fn order_items_by_products(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<OrderItem>, StoreError>;

    async fn reviews_by_buyer(&self, buyer_id: i64) -> Result<Vec<Review>, StoreError>;

    async fn count_orders_by_buyer(&self, buyer_id: i64) -> Result<u64, StoreError>;

    async fn count_reviews_by_buyer(&self, buyer_id: i64) -> Result<u64, StoreError>;
}
