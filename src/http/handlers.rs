// ============================================================================
// Endpoint Handlers
// ============================================================================
//
// Thin glue between actix and the aggregation service. Each handler follows
// the same sequence: validate the path id, run the ownership check, call one
// service operation, render the outcome. Malformed ids never reach the
// store.
//
// Error mapping:
// - InvalidArgument  -> 400 with the validation message
// - Unauthenticated  -> 401
// - Forbidden        -> 403
// - NotFound         -> 404 naming the missing entity
// - store failures   -> 500 carrying an opaque request id; the cause stays
//                       in the server log
//
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::activity::{ActivityError, ActivityService};
use crate::metrics::Metrics;
use crate::store::EntityStore;

use super::auth::{authorize, caller_from, AccessError, Subject};

/// Shared per-worker state, wrapped in `web::Data` by the server setup.
pub struct AppState {
    pub service: ActivityService,
    pub store: Arc<dyn EntityStore>,
    pub metrics: Arc<Metrics>,
    pub enforce_ownership: bool,
}

#[derive(Debug)]
enum EndpointError {
    Activity(ActivityError),
    Access(AccessError),
}

impl From<ActivityError> for EndpointError {
    fn from(e: ActivityError) -> Self {
        Self::Activity(e)
    }
}

impl From<AccessError> for EndpointError {
    fn from(e: AccessError) -> Self {
        Self::Access(e)
    }
}

/// Path ids must be positive integers. Everything else is rejected here,
/// before any store access.
fn parse_subject_id(raw: &str) -> Result<i64, ActivityError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ActivityError::InvalidArgument(format!(
            "expected a positive integer id, got {raw:?}"
        ))),
    }
}

async fn guard(state: &AppState, req: &HttpRequest, subject: Subject) -> Result<(), AccessError> {
    authorize(
        state.enforce_ownership,
        caller_from(req),
        subject,
        state.store.as_ref(),
    )
    .await
}

/// Renders the outcome and records the request metrics in one place.
fn finish(
    state: &AppState,
    operation: &'static str,
    started: Instant,
    result: Result<HttpResponse, EndpointError>,
) -> HttpResponse {
    // Access checks can themselves hit the store; fold that failure into
    // the ordinary dependency path.
    let result = match result {
        Err(EndpointError::Access(AccessError::Store(e))) => {
            Err(EndpointError::Activity(ActivityError::Dependency(e)))
        }
        other => other,
    };

    let (outcome, response) = match result {
        Ok(response) => ("ok", response),
        Err(EndpointError::Activity(err @ ActivityError::InvalidArgument(_))) => (
            "invalid_id",
            HttpResponse::BadRequest().json(serde_json::json!({ "error": err.to_string() })),
        ),
        Err(EndpointError::Activity(err @ ActivityError::NotFound { .. })) => (
            "not_found",
            HttpResponse::NotFound().json(serde_json::json!({ "error": err.to_string() })),
        ),
        Err(EndpointError::Activity(ActivityError::Dependency(source))) => {
            let request_id = Uuid::new_v4().to_string();
            tracing::error!(
                %request_id,
                operation,
                error = %source,
                "entity store failure while serving activity view"
            );
            state.metrics.record_store_failure(operation);
            (
                "error",
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal server error",
                    "requestId": request_id,
                })),
            )
        }
        Err(EndpointError::Access(AccessError::Unauthenticated)) => (
            "unauthenticated",
            HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "authentication required" })),
        ),
        Err(EndpointError::Access(AccessError::Forbidden)) => (
            "forbidden",
            HttpResponse::Forbidden().json(serde_json::json!({ "error": "access denied" })),
        ),
        Err(EndpointError::Access(AccessError::Store(_))) => unreachable!("folded above"),
    };

    state
        .metrics
        .record_request(operation, outcome, started.elapsed().as_secs_f64());
    response
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn user_reviews(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let started = Instant::now();
    let result = user_reviews_inner(&state, &req, &path).await;
    finish(&state, "user_reviews", started, result)
}

async fn user_reviews_inner(
    state: &AppState,
    req: &HttpRequest,
    raw_id: &str,
) -> Result<HttpResponse, EndpointError> {
    let user_id = parse_subject_id(raw_id)?;
    guard(state, req, Subject::User(user_id)).await?;
    let view = state.service.user_reviews(user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn buyer_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let started = Instant::now();
    let result = buyer_orders_inner(&state, &req, &path).await;
    finish(&state, "buyer_orders", started, result)
}

async fn buyer_orders_inner(
    state: &AppState,
    req: &HttpRequest,
    raw_id: &str,
) -> Result<HttpResponse, EndpointError> {
    let buyer_id = parse_subject_id(raw_id)?;
    guard(state, req, Subject::Buyer(buyer_id)).await?;
    let view = state.service.buyer_orders(buyer_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn seller_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let started = Instant::now();
    let result = seller_orders_inner(&state, &req, &path).await;
    finish(&state, "seller_orders", started, result)
}

async fn seller_orders_inner(
    state: &AppState,
    req: &HttpRequest,
    raw_id: &str,
) -> Result<HttpResponse, EndpointError> {
    let seller_id = parse_subject_id(raw_id)?;
    guard(state, req, Subject::Seller(seller_id)).await?;
    let view = state.service.seller_orders(seller_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn seller_stats(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let started = Instant::now();
    let result = seller_stats_inner(&state, &req, &path).await;
    finish(&state, "seller_stats", started, result)
}

async fn seller_stats_inner(
    state: &AppState,
    req: &HttpRequest,
    raw_id: &str,
) -> Result<HttpResponse, EndpointError> {
    let seller_id = parse_subject_id(raw_id)?;
    guard(state, req, Subject::Seller(seller_id)).await?;
    let stats = state.service.seller_stats(seller_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn user_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let started = Instant::now();
    let result = user_profile_inner(&state, &req, &path).await;
    finish(&state, "user_profile", started, result)
}

async fn user_profile_inner(
    state: &AppState,
    req: &HttpRequest,
    raw_id: &str,
) -> Result<HttpResponse, EndpointError> {
    let user_id = parse_subject_id(raw_id)?;
    guard(state, req, Subject::User(user_id)).await?;
    let profile = state.service.user_profile(user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

// ============================================================================
// Tests
// ============================================================================
