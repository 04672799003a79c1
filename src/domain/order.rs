use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Order Entities & Status Policy
// ============================================================================
//
// Orders belong to exactly one Buyer and carry an ordered sequence of
// OrderItems. An item snapshots the unit price at purchase time; the product
// name is resolved at query time from the catalog.
//
// The status policy (which statuses bear revenue, which count as awaiting
// fulfillment) is an explicit contract here rather than something inferred
// inside a query, because seller statistics depend on it.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    pub status: OrderStatus,
    /// Order total in minor currency units.
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price in minor currency units, captured at purchase time.
    pub unit_price: i64,
}

impl OrderItem {
    /// Line total (`quantity × unit_price`) in minor units.
    pub fn line_total(&self) -> i64 {
        i64::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether an order in this status contributes to seller revenue.
    /// Payment is collected up front, so anything paid or later qualifies;
    /// pending orders are unpaid and cancelled orders never count.
    pub fn counts_toward_revenue(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Completed
        )
    }

    /// Whether an order in this status still awaits seller action.
    /// Shipped orders are out of the seller's hands; completed and
    /// cancelled orders are terminal.
    pub fn is_unfulfilled(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown order status: {0:?}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "created" is the order-management collaborator's historical
            // name for the initial state; normalize it to pending.
            "pending" | "created" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
