use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{EntityStore, StoreError};
use crate::domain::{Buyer, Order, OrderItem, Product, Review, Seller, User};

// ============================================================================
// In-Memory Entity Store (test backend)
// ============================================================================
//
// BTreeMap-backed twin of the PostgreSQL store. Records are inserted during
// fixture setup and only read afterwards, so no interior locking is needed;
// BTreeMap iteration gives the ascending-id ordering the read interface
// promises without an explicit sort.
//
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: BTreeMap<i64, User>,
    buyers: BTreeMap<i64, Buyer>,
    sellers: BTreeMap<i64, Seller>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    order_items: BTreeMap<i64, OrderItem>,
    reviews: BTreeMap<i64, Review>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_buyer(&mut self, buyer: Buyer) {
        self.buyers.insert(buyer.id, buyer);
    }

    pub fn insert_seller(&mut self, seller: Seller) {
        self.sellers.insert(seller.id, seller);
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn insert_order(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn insert_order_item(&mut self, item: OrderItem) {
        self.order_items.insert(item.id, item);
    }

    pub fn insert_review(&mut self, review: Review) {
        self.reviews.insert(review.id, review);
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn buyer_by_id(&self, buyer_id: i64) -> Result<Option<Buyer>, StoreError> {
        Ok(self.buyers.get(&buyer_id).cloned())
    }

    async fn buyers_by_ids(&self, ids: &[i64]) -> Result<Vec<Buyer>, StoreError> {
        Ok(self
            .buyers
            .values()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn buyer_by_user_id(&self, user_id: i64) -> Result<Option<Buyer>, StoreError> {
        Ok(self
            .buyers
            .values()
            .find(|b| b.user_id == user_id)
            .cloned())
    }

    async fn seller_by_id(&self, seller_id: i64) -> Result<Option<Seller>, StoreError> {
        Ok(self.sellers.get(&seller_id).cloned())
    }

    async fn seller_by_user_id(&self, user_id: i64) -> Result<Option<Seller>, StoreError> {
        Ok(self
            .sellers
            .values()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn products_by_seller(&self, seller_id: i64) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .values()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn orders_by_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .values()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn orders_by_ids(&self, ids: &[i64]) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .values()
            .filter(|o| ids.contains(&o.id))
            .cloned()
            .collect())
    }

    async fn order_items_by_order(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn order_items_by_products(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .order_items
            .values()
            .filter(|i| product_ids.contains(&i.product_id))
            .cloned()
            .collect())
    }

    async fn reviews_by_buyer(&self, buyer_id: i64) -> Result<Vec<Review>, StoreError> {
        Ok(self
            .reviews
            .values()
            .filter(|r| r.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn count_orders_by_buyer(&self, buyer_id: i64) -> Result<u64, StoreError> {
        Ok(self
            .orders
            .values()
            .filter(|o| o.buyer_id == buyer_id)
            .count() as u64)
    }

    async fn count_reviews_by_buyer(&self, buyer_id: i64) -> Result<u64, StoreError> {
        Ok(self
            .reviews
            .values()
            .filter(|r| r.buyer_id == buyer_id)
            .count() as u64)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::OrderStatus;

    #[tokio::test]
    async fn test_multi_row_results_come_back_in_id_order() {
        let mut store = InMemoryStore::new();
        for id in [30, 10, 20] {
            store.insert_order(Order {
                id,
                buyer_id: 1,
                status: OrderStatus::Pending,
                total_price: 500,
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            });
        }

        let orders = store.orders_by_buyer(1).await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_lookup_by_foreign_key() {
        let mut store = InMemoryStore::new();
        store.insert_buyer(Buyer { id: 7, user_id: 42 });

        let hit = store.buyer_by_user_id(42).await.unwrap();
        assert_eq!(hit.map(|b| b.id), Some(7));

        let miss = store.buyer_by_user_id(43).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_result() {
        let mut store = InMemoryStore::new();
        store.insert_product(Product {
            id: 1,
            seller_id: 1,
            name: "Rice 5kg".to_string(),
        });

        let products = store.products_by_ids(&[]).await.unwrap();
        assert!(products.is_empty());

        let items = store.order_items_by_products(&[]).await.unwrap();
        assert!(items.is_empty());
    }
}
