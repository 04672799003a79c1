// ============================================================================
// Activity Aggregation - Consolidated Read Views
// ============================================================================
//
// This module owns the only non-trivial computation in the service: joining
// the marketplace entities into denormalized activity views and deriving
// seller statistics from raw order records.
//
// - dto:     one explicit struct per response shape, with constructors that
//            enumerate every field and default broken references
// - error:   the error taxonomy the endpoint layer maps to HTTP outcomes
// - service: the aggregation operations themselves
//
// ============================================================================

pub mod dto;
pub mod error;
pub mod service;

// Re-export for convenience
pub use dto::*;
pub use error::ActivityError;
pub use service::ActivityService;
