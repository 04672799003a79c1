use serde::{Deserialize, Serialize};

// ============================================================================
// Identity Entities
// ============================================================================
//
// A User is the base identity. A User may additionally hold a Buyer profile
// (purchasing side) and/or a Seller profile (storefront side); both wrap the
// User one-to-one via `user_id`.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: i64,
    pub user_id: i64,
}

/// Catalog product, modeled down to the columns the aggregation reads.
/// The catalog workflow owns the full record (pricing, stock, images).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
}
