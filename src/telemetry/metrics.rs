//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Latency buckets in seconds, with sub-millisecond resolution for cached reads.
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup.
pub fn describe_metrics() {
    // HTTP metrics
    describe_counter!("delivery_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "delivery_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    // Auth metrics
    describe_counter!("delivery_auth_login_total", "Total number of login attempts");

    // Business metrics
    describe_counter!("delivery_orders_created_total", "Orders placed");
    describe_counter!("delivery_orders_cancelled_total", "Orders cancelled");
    describe_counter!("delivery_payments_total", "Payments recorded or cancelled");

    counter!("delivery_auth_login_total", "result" => "success").absolute(0);
    counter!("delivery_auth_login_total", "result" => "failure").absolute(0);
    counter!("delivery_orders_created_total", "order_type" => "DELIVERY").absolute(0);
    counter!("delivery_orders_created_total", "order_type" => "TAKEOUT").absolute(0);
    counter!("delivery_orders_cancelled_total").absolute(0);
    counter!("delivery_payments_total", "status" => "completed").absolute(0);
}
