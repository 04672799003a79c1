// ============================================================================
// Response Shapes
// ============================================================================
//
// Every endpoint renders one of the structs below. The shapes are fixed and
// explicit: constructors enumerate every field, optional upstream data turns
// into `None` or an empty list, and broken references render a placeholder
// instead of failing the request.
//
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Order, OrderItem, OrderStatus, Product, Review, User};

/// Rendered in place of a product name when an order item or review points
/// at a product the catalog no longer contains.
pub const MISSING_PRODUCT_NAME: &str = "[missing product]";

/// Rendered in place of a buyer name when an order's buyer row or the
/// buyer's user row is gone.
pub const UNKNOWN_BUYER_NAME: &str = "[unknown buyer]";

// ============================================================================
// Review History
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReviews {
    pub user_id: i64,
    pub reviews: Vec<ReviewEntry>,
}

/// One review with its product reference resolved to a display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewEntry {
    /// A missing product keeps the stored reference id and renders the
    /// placeholder name.
    pub fn from_review(review: &Review, product: Option<&Product>) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            product_name: product
                .map_or_else(|| MISSING_PRODUCT_NAME.to_string(), |p| p.name.clone()),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
        }
    }
}

// ============================================================================
// Purchase History (buyer side)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerOrders {
    pub buyer_id: i64,
    pub orders: Vec<BuyerOrderEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerOrderEntry {
    pub id: i64,
    /// Order total in minor currency units, as captured at checkout.
    pub total_price: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemEntry>,
}

impl BuyerOrderEntry {
    pub fn from_order(order: &Order, items: Vec<OrderItemEntry>) -> Self {
        Self {
            id: order.id,
            total_price: order.total_price,
            status: order.status,
            created_at: order.created_at,
            items,
        }
    }
}

/// One order line with its product reference resolved to a display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemEntry {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price in minor currency units, as captured at purchase time.
    pub price: i64,
}

impl OrderItemEntry {
    pub fn from_item(item: &OrderItem, product: Option<&Product>) -> Self {
        Self {
            product_id: item.product_id,
            product_name: product
                .map_or_else(|| MISSING_PRODUCT_NAME.to_string(), |p| p.name.clone()),
            quantity: item.quantity,
            price: item.unit_price,
        }
    }
}

// ============================================================================
// Received Orders (seller side)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrders {
    pub seller_id: i64,
    pub orders: Vec<SellerOrderEntry>,
}

/// An order as one seller sees it: only that seller's own line items, but
/// the order-level fields (total, status) of the whole order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrderEntry {
    pub order_id: i64,
    pub buyer_name: String,
    pub total_price: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemEntry>,
}

impl SellerOrderEntry {
    pub fn from_order(order: &Order, buyer_name: Option<&str>, items: Vec<OrderItemEntry>) -> Self {
        Self {
            order_id: order.id,
            buyer_name: buyer_name.unwrap_or(UNKNOWN_BUYER_NAME).to_string(),
            total_price: order.total_price,
            status: order.status,
            created_at: order.created_at,
            items,
        }
    }
}

// ============================================================================
// Seller Statistics
// ============================================================================

/// Aggregates derived from a seller's order history on every request.
/// Nothing here is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStats {
    pub seller_id: i64,
    /// Orders containing at least one of the seller's products, regardless
    /// of status.
    pub total_orders: u64,
    /// Sum of the seller's own line totals across paid, shipped and
    /// completed orders, in minor currency units.
    pub total_revenue: i64,
    pub total_products: u64,
    /// Orders still awaiting fulfilment (pending or paid).
    pub pending_orders: u64,
}

impl SellerStats {
    pub fn empty(seller_id: i64) -> Self {
        Self {
            seller_id,
            total_orders: 0,
            total_revenue: 0,
            total_products: 0,
            pending_orders: 0,
        }
    }
}

// ============================================================================
// Composite Profile
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    /// Present only when the user acts as a buyer.
    pub buyer: Option<BuyerSummary>,
    /// Present only when the user acts as a seller.
    pub seller: Option<SellerStats>,
}

impl UserProfile {
    pub fn from_user(user: &User, buyer: Option<BuyerSummary>, seller: Option<SellerStats>) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            buyer,
            seller,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerSummary {
    pub buyer_id: i64,
    pub total_orders: u64,
    pub total_reviews: u64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            seller_id: 1,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_review_entry_resolves_product_name() {
        let review = Review {
            id: 7,
            buyer_id: 3,
            product_id: 42,
            rating: 5,
            comment: "crunchy".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        };

        let entry = ReviewEntry::from_review(&review, Some(&product(42, "Sourdough Loaf")));
        assert_eq!(entry.product_name, "Sourdough Loaf");
        assert_eq!(entry.product_id, 42);

        let orphaned = ReviewEntry::from_review(&review, None);
        assert_eq!(orphaned.product_name, MISSING_PRODUCT_NAME);
        assert_eq!(orphaned.product_id, 42);
    }

    #[test]
    fn test_order_item_entry_defaults_missing_product() {
        let item = OrderItem {
            id: 1,
            order_id: 10,
            product_id: 99,
            quantity: 2,
            unit_price: 350,
        };

        let entry = OrderItemEntry::from_item(&item, None);
        assert_eq!(entry.product_name, MISSING_PRODUCT_NAME);
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.price, 350);
    }

    #[test]
    fn test_seller_order_entry_defaults_unknown_buyer() {
        let order = Order {
            id: 10,
            buyer_id: 3,
            status: OrderStatus::Paid,
            total_price: 700,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        };

        let entry = SellerOrderEntry::from_order(&order, None, Vec::new());
        assert_eq!(entry.buyer_name, UNKNOWN_BUYER_NAME);

        let named = SellerOrderEntry::from_order(&order, Some("Ada"), Vec::new());
        assert_eq!(named.buyer_name, "Ada");
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let user = User {
            id: 5,
            name: "Ada".to_string(),
            username: "ada".to_string(),
            email: "ada@mail.test".to_string(),
            avatar: None,
        };

        let profile = UserProfile::from_user(
            &user,
            Some(BuyerSummary {
                buyer_id: 9,
                total_orders: 2,
                total_reviews: 1,
            }),
            Some(SellerStats::empty(4)),
        );

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["userId"], 5);
        assert_eq!(json["buyer"]["buyerId"], 9);
        assert_eq!(json["buyer"]["totalOrders"], 2);
        assert_eq!(json["seller"]["sellerId"], 4);
        assert_eq!(json["seller"]["pendingOrders"], 0);
        assert!(json["avatar"].is_null());
    }

    #[test]
    fn test_empty_stats_are_all_zero() {
        let stats = SellerStats::empty(8);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, 0);
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.pending_orders, 0);
    }
}
