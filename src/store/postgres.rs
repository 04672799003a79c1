use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

use super::{EntityStore, StoreError};
use crate::domain::{Buyer, Order, OrderItem, OrderStatus, Product, Review, Seller, User};

// ============================================================================
// PostgreSQL Entity Store
// ============================================================================
//
// Production backend. Queries are plain runtime-bound SQL (no compile-time
// database requirement); batched lookups use `= ANY($1)` array binds. All
// multi-row queries order by ascending id to keep responses deterministic.
//
// The schema these queries read is owned by the upstream order/catalog/review
// workflows; migrations/0001_entities.sql documents it for local setups.
//
// ============================================================================

pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            avatar: row.try_get("avatar")?,
        })
    }
}

impl FromRow<'_, PgRow> for Buyer {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
        })
    }
}

impl FromRow<'_, PgRow> for Seller {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
        })
    }
}

impl FromRow<'_, PgRow> for Product {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            seller_id: row.try_get("seller_id")?,
            name: row.try_get("name")?,
        })
    }
}

impl FromRow<'_, PgRow> for Order {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        // Status is stored as TEXT; an unknown value is a decode error, not
        // a silently defaulted status, because the stats policy depends on it.
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            buyer_id: row.try_get("buyer_id")?,
            status,
            total_price: row.try_get("total_price")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, PgRow> for OrderItem {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            unit_price: row.try_get("unit_price")?,
        })
    }
}

impl FromRow<'_, PgRow> for Review {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            buyer_id: row.try_get("buyer_id")?,
            product_id: row.try_get("product_id")?,
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// ============================================================================
// Read Interface Implementation
// ============================================================================

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, avatar FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, avatar FROM users \
             WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn buyer_by_id(&self, buyer_id: i64) -> Result<Option<Buyer>, StoreError> {
        let buyer =
            sqlx::query_as::<_, Buyer>("SELECT id, user_id FROM buyers WHERE id = $1")
                .bind(buyer_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(buyer)
    }

    async fn buyers_by_ids(&self, ids: &[i64]) -> Result<Vec<Buyer>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let buyers = sqlx::query_as::<_, Buyer>(
            "SELECT id, user_id FROM buyers WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(buyers)
    }

    async fn buyer_by_user_id(&self, user_id: i64) -> Result<Option<Buyer>, StoreError> {
        let buyer =
            sqlx::query_as::<_, Buyer>("SELECT id, user_id FROM buyers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(buyer)
    }

    async fn seller_by_id(&self, seller_id: i64) -> Result<Option<Seller>, StoreError> {
        let seller =
            sqlx::query_as::<_, Seller>("SELECT id, user_id FROM sellers WHERE id = $1")
                .bind(seller_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(seller)
    }

    async fn seller_by_user_id(&self, user_id: i64) -> Result<Option<Seller>, StoreError> {
        let seller =
            sqlx::query_as::<_, Seller>("SELECT id, user_id FROM sellers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(seller)
    }

    async fn products_by_seller(&self, seller_id: i64) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, seller_id, name FROM products WHERE seller_id = $1 ORDER BY id",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(seller_id, count = products.len(), "loaded seller catalog");
        Ok(products)
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, Product>(
            "SELECT id, seller_id, name FROM products WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn orders_by_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, StoreError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, buyer_id, status, total_price, created_at FROM orders \
             WHERE buyer_id = $1 ORDER BY id",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(buyer_id, count = orders.len(), "loaded buyer orders");
        Ok(orders)
    }

    async fn orders_by_ids(&self, ids: &[i64]) -> Result<Vec<Order>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, buyer_id, status, total_price, created_at FROM orders \
             WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn order_items_by_order(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, unit_price FROM order_items \
             WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn order_items_by_products(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<OrderItem>, StoreError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, unit_price FROM order_items \
             WHERE product_id = ANY($1) ORDER BY id",
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn reviews_by_buyer(&self, buyer_id: i64) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, buyer_id, product_id, rating, comment, created_at FROM reviews \
             WHERE buyer_id = $1 ORDER BY id",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn count_orders_by_buyer(&self, buyer_id: i64) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE buyer_id = $1")
            .bind(buyer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn count_reviews_by_buyer(&self, buyer_id: i64) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE buyer_id = $1")
            .bind(buyer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

// Query behavior (filters, ordering, empty batches) is exercised against the
// in-memory twin by the service tests; running these statements needs a live
// PostgreSQL instance seeded with migrations/0001_entities.sql.
