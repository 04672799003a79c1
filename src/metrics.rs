// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Endpoint traffic (request counts by operation and outcome)
// - Request latency per operation
// - Entity store failures surfaced to callers
//
// All metrics are registered with Prometheus and scraped via /metrics on the
// main HTTP server.
// ============================================================================

use actix_web::{web, HttpResponse, Responder};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Endpoint Metrics
    pub requests_total: IntCounterVec,
    pub request_duration: HistogramVec,

    // Store Metrics
    pub store_failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Endpoint Metrics
        let requests_total = IntCounterVec::new(
            Opts::new("activity_requests_total", "Total activity view requests"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new("activity_request_duration_seconds", "Activity view request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        // Store Metrics
        let store_failures = IntCounterVec::new(
            Opts::new("activity_store_failures_total", "Entity store failures surfaced to callers"),
            &["operation"],
        )?;
        registry.register(Box::new(store_failures.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            store_failures,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one finished request
    pub fn record_request(&self, operation: &str, outcome: &str, duration_secs: f64) {
        self.requests_total.with_label_values(&[operation, outcome]).inc();
        self.request_duration.with_label_values(&[operation]).observe(duration_secs);
    }

    /// Helper to record a store failure that became a 500
    pub fn record_store_failure(&self, operation: &str) {
        self.store_failures.with_label_values(&[operation]).inc();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

// ============================================================================
// Scrape and liveness handlers, mounted on the main HTTP server
// ============================================================================

pub async fn metrics_handler(metrics: web::Data<Arc<Metrics>>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "market-activity"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("user_profile", "ok", 0.002);
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_request() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("user_reviews", "ok", 0.05);
        metrics.record_request("user_reviews", "not_found", 0.01);

        let gathered = metrics.registry.gather();
        let requests = gathered.iter().find(|m| m.name() == "activity_requests_total").unwrap();
        assert_eq!(requests.metric.len(), 2); // Two different outcome labels

        let duration = gathered.iter().find(|m| m.name() == "activity_request_duration_seconds").unwrap();
        assert_eq!(duration.metric.len(), 1); // Latency keyed by operation only
    }

    #[test]
    fn test_record_store_failure() {
        let metrics = Metrics::new().unwrap();
        metrics.record_store_failure("buyer_orders");
        metrics.record_store_failure("buyer_orders");

        let gathered = metrics.registry.gather();
        let failures = gathered.iter().find(|m| m.name() == "activity_store_failures_total").unwrap();
        assert_eq!(failures.metric[0].counter.value, Some(2.0));
    }
}
