// ============================================================================
// HTTP Layer - Routing and Endpoint Glue
// ============================================================================

pub mod auth;
pub mod handlers;

use actix_web::web;

use crate::metrics;

/// Mounts every route the service exposes. The activity views live under
/// /user-activity; the scrape and liveness endpoints sit at the root.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user-activity/user/{user_id}/reviews",
        web::get().to(handlers::user_reviews),
    )
    .route(
        "/user-activity/buyer/{buyer_id}/orders",
        web::get().to(handlers::buyer_orders),
    )
    .route(
        "/user-activity/seller/{seller_id}/orders",
        web::get().to(handlers::seller_orders),
    )
    .route(
        "/user-activity/seller/{seller_id}/stats",
        web::get().to(handlers::seller_stats),
    )
    .route(
        "/user-activity/user/{user_id}/profile",
        web::get().to(handlers::user_profile),
    )
    .route("/metrics", web::get().to(metrics::metrics_handler))
    .route("/health", web::get().to(metrics::health_handler));
}
