// ============================================================================
// Aggregation Service
// ============================================================================
//
// Read-side composition over the entity store. Each operation resolves its
// subject first, then batches the dependent lookups; independent reads run
// concurrently. Referential gaps between entities degrade to placeholders
// and a warning, never to a failed request.
//
// ============================================================================

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::try_join_all;
use futures_util::try_join;

use crate::domain::{Order, OrderItem, Product, Seller};
use crate::store::EntityStore;

use super::dto::{
    BuyerOrderEntry, BuyerOrders, BuyerSummary, OrderItemEntry, ReviewEntry, SellerOrderEntry,
    SellerOrders, SellerStats, UserProfile, UserReviews,
};
use super::error::ActivityError;

pub struct ActivityService {
    store: Arc<dyn EntityStore>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Review history
    // ========================================================================

    /// All reviews written by the buyer behind `user_id`, with product names
    /// resolved.
    pub async fn user_reviews(&self, user_id: i64) -> Result<UserReviews, ActivityError> {
        let buyer = self
            .store
            .buyer_by_user_id(user_id)
            .await?
            .ok_or_else(|| ActivityError::not_found("buyer profile for user", user_id))?;

        let reviews = self.store.reviews_by_buyer(buyer.id).await?;
        let products = self
            .products_for(reviews.iter().map(|r| r.product_id))
            .await?;

        let entries = reviews
            .iter()
            .map(|review| {
                let product = products.get(&review.product_id);
                if product.is_none() {
                    tracing::warn!(
                        review_id = review.id,
                        product_id = review.product_id,
                        "review references a missing product; rendering placeholder"
                    );
                }
                ReviewEntry::from_review(review, product)
            })
            .collect();

        Ok(UserReviews {
            user_id,
            reviews: entries,
        })
    }

    // ========================================================================
    // Purchase history
    // ========================================================================

    /// The buyer's orders, newest last, each with its line items inlined.
    pub async fn buyer_orders(&self, buyer_id: i64) -> Result<BuyerOrders, ActivityError> {
        let buyer = self
            .store
            .buyer_by_id(buyer_id)
            .await?
            .ok_or_else(|| ActivityError::not_found("buyer", buyer_id))?;

        let orders = self.store.orders_by_buyer(buyer.id).await?;

        // Item lists of distinct orders live on disjoint rows, so they are
        // safe to fetch concurrently.
        let item_lists = try_join_all(
            orders
                .iter()
                .map(|order| self.store.order_items_by_order(order.id)),
        )
        .await?;

        let products = self
            .products_for(item_lists.iter().flatten().map(|item| item.product_id))
            .await?;

        let entries = orders
            .iter()
            .zip(item_lists)
            .map(|(order, items)| {
                let rows = denormalize_items(&items, &products);
                BuyerOrderEntry::from_order(order, rows)
            })
            .collect();

        Ok(BuyerOrders {
            buyer_id: buyer.id,
            orders: entries,
        })
    }

    // ========================================================================
    // Received orders
    // ========================================================================

    /// Orders containing at least one of the seller's products. Each entry
    /// carries only that seller's line items; an order spanning several
    /// sellers appears in each seller's view with a disjoint item subset.
    pub async fn seller_orders(&self, seller_id: i64) -> Result<SellerOrders, ActivityError> {
        let seller = self
            .store
            .seller_by_id(seller_id)
            .await?
            .ok_or_else(|| ActivityError::not_found("seller", seller_id))?;

        let products = self.store.products_by_seller(seller.id).await?;
        if products.is_empty() {
            return Ok(SellerOrders {
                seller_id: seller.id,
                orders: Vec::new(),
            });
        }

        let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let catalog: HashMap<i64, Product> =
            products.into_iter().map(|p| (p.id, p)).collect();

        let seller_items = self.store.order_items_by_products(&product_ids).await?;
        let items_by_order = group_by_order(seller_items);

        let order_ids: Vec<i64> = items_by_order.keys().copied().collect();
        let orders = self.store.orders_by_ids(&order_ids).await?;
        warn_missing_orders(&order_ids, &orders);

        let buyer_names = self.buyer_names_for(&orders).await?;

        let entries = orders
            .iter()
            .map(|order| {
                let items = items_by_order
                    .get(&order.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let rows = denormalize_items(items, &catalog);
                let buyer_name = buyer_names.get(&order.buyer_id).map(String::as_str);
                if buyer_name.is_none() {
                    tracing::warn!(
                        order_id = order.id,
                        buyer_id = order.buyer_id,
                        "order references a missing buyer; rendering placeholder"
                    );
                }
                SellerOrderEntry::from_order(order, buyer_name, rows)
            })
            .collect();

        Ok(SellerOrders {
            seller_id: seller.id,
            orders: entries,
        })
    }

    // ========================================================================
    // Seller statistics
    // ========================================================================

    /// Order and revenue aggregates for one seller, derived on the fly.
    pub async fn seller_stats(&self, seller_id: i64) -> Result<SellerStats, ActivityError> {
        let seller = self
            .store
            .seller_by_id(seller_id)
            .await?
            .ok_or_else(|| ActivityError::not_found("seller", seller_id))?;

        self.stats_for(&seller).await
    }

    // ========================================================================
    // Composite profile
    // ========================================================================

    /// The user record plus whichever buyer and seller summaries apply.
    pub async fn user_profile(&self, user_id: i64) -> Result<UserProfile, ActivityError> {
        let user = self
            .store
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| ActivityError::not_found("user", user_id))?;

        // Buyer and seller profiles live on disjoint rows.
        let (buyer, seller) = try_join!(
            self.store.buyer_by_user_id(user.id),
            self.store.seller_by_user_id(user.id),
        )?;

        let buyer_summary = match buyer {
            Some(buyer) => {
                let (total_orders, total_reviews) = try_join!(
                    self.store.count_orders_by_buyer(buyer.id),
                    self.store.count_reviews_by_buyer(buyer.id),
                )?;
                Some(BuyerSummary {
                    buyer_id: buyer.id,
                    total_orders,
                    total_reviews,
                })
            }
            None => None,
        };

        let seller_summary = match seller {
            Some(seller) => Some(self.stats_for(&seller).await?),
            None => None,
        };

        Ok(UserProfile::from_user(&user, buyer_summary, seller_summary))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Shared by the stats endpoint and the profile view.
    async fn stats_for(&self, seller: &Seller) -> Result<SellerStats, ActivityError> {
        let products = self.store.products_by_seller(seller.id).await?;
        if products.is_empty() {
            return Ok(SellerStats::empty(seller.id));
        }
        let total_products = products.len() as u64;

        let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let items = self.store.order_items_by_products(&product_ids).await?;
        let items_by_order = group_by_order(items);

        let order_ids: Vec<i64> = items_by_order.keys().copied().collect();
        let orders = self.store.orders_by_ids(&order_ids).await?;
        warn_missing_orders(&order_ids, &orders);

        let mut total_orders = 0u64;
        let mut pending_orders = 0u64;
        let mut total_revenue = 0i64;

        for order in &orders {
            if let Some(order_items) = items_by_order.get(&order.id) {
                total_orders += 1;
                if order.status.is_unfulfilled() {
                    pending_orders += 1;
                }
                if order.status.counts_toward_revenue() {
                    total_revenue += order_items.iter().map(OrderItem::line_total).sum::<i64>();
                }
            }
        }

        Ok(SellerStats {
            seller_id: seller.id,
            total_orders,
            total_revenue,
            total_products,
            pending_orders,
        })
    }

    /// Batched product lookup keyed by id, for name resolution.
    async fn products_for(
        &self,
        ids: impl Iterator<Item = i64>,
    ) -> Result<HashMap<i64, Product>, ActivityError> {
        let mut unique: Vec<i64> = ids.collect();
        unique.sort_unstable();
        unique.dedup();

        let products = self.store.products_by_ids(&unique).await?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Display names of the buyers behind `orders`, keyed by buyer id.
    /// A broken buyer or user join produces no entry rather than an error.
    async fn buyer_names_for(
        &self,
        orders: &[Order],
    ) -> Result<HashMap<i64, String>, ActivityError> {
        let mut buyer_ids: Vec<i64> = orders.iter().map(|o| o.buyer_id).collect();
        buyer_ids.sort_unstable();
        buyer_ids.dedup();

        let buyers = self.store.buyers_by_ids(&buyer_ids).await?;
        let user_ids: Vec<i64> = buyers.iter().map(|b| b.user_id).collect();
        let users = self.store.users_by_ids(&user_ids).await?;
        let names: HashMap<i64, String> = users.into_iter().map(|u| (u.id, u.name)).collect();

        Ok(buyers
            .into_iter()
            .filter_map(|b| names.get(&b.user_id).map(|name| (b.id, name.clone())))
            .collect())
    }
}

/// Groups line items under their order id. The B-tree keeps order ids
/// ascending so repeated reads render identically.
fn group_by_order(items: Vec<OrderItem>) -> BTreeMap<i64, Vec<OrderItem>> {
    let mut grouped: BTreeMap<i64, Vec<OrderItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.order_id).or_default().push(item);
    }
    grouped
}

fn denormalize_items(items: &[OrderItem], catalog: &HashMap<i64, Product>) -> Vec<OrderItemEntry> {
    items
        .iter()
        .map(|item| {
            let product = catalog.get(&item.product_id);
            if product.is_none() {
                tracing::warn!(
                    order_id = item.order_id,
                    product_id = item.product_id,
                    "order item references a missing product; rendering placeholder"
                );
            }
            OrderItemEntry::from_item(item, product)
        })
        .collect()
}

fn warn_missing_orders(order_ids: &[i64], orders: &[Order]) {
    if orders.len() == order_ids.len() {
        return;
    }
    let known: HashSet<i64> = orders.iter().map(|o| o.id).collect();
    for order_id in order_ids.iter().filter(|id| !known.contains(*id)) {
        tracing::warn!(
            order_id = *order_id,
            "line items reference a missing order; skipping"
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
