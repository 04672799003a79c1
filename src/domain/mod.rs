// ============================================================================
// Domain Layer - Marketplace Entities
// ============================================================================
//
// Read-only records for the entities the activity aggregation consumes.
// Each entity is owned and mutated by an upstream workflow (checkout,
// catalog management, review submission); this service only reads and
// reshapes them.
//
// Conventions:
// - Identifiers are positive 64-bit integers.
// - Monetary amounts are integer minor units (cents); arithmetic is exact.
//
// ============================================================================

pub mod order;
pub mod review;
pub mod user;

// Re-export for convenience
pub use order::*;
pub use review::*;
pub use user::*;
