use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Review Entity
// ============================================================================

/// Product review authored by a Buyer. The rating range is enforced by the
/// catalog workflow at write time (typically 1 through 5); this service
/// renders whatever is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub buyer_id: i64,
    pub product_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
