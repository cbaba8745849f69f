use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // State store metrics
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "store_operations_total",
        "Total number of state store operations",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref STORE_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "store_operation_duration_seconds",
        "State store operation duration in seconds",
        &["operation"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1]
    )
    .unwrap();

    // Business Metrics
    pub static ref EMAILS_SENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        "emails_sent_total",
        "Total number of puzzle emails by mode and outcome",
        &["mode", "status"]
    )
    .unwrap();

    pub static ref PUZZLE_SELECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "puzzle_selections_total",
        "Total number of daily selections by challenge pool and outcome",
        &["pool", "outcome"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track state store operation with metrics
pub async fn track_store_operation<F, T, E>(operation: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_metrics() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/send-question", "200"])
            .inc();
        EMAILS_SENT_TOTAL
            .with_label_values(&["question", "success"])
            .inc();

        let output = render_metrics().unwrap();
        assert!(output.contains("http_requests_total"));
        assert!(output.contains("emails_sent_total"));
    }

    #[tokio::test]
    async fn test_track_store_operation_counts_errors() {
        let before = STORE_OPERATIONS_TOTAL
            .with_label_values(&["metrics-test", "error"])
            .get();

        let result: Result<(), &str> =
            track_store_operation("metrics-test", async { Err("boom") }).await;

        assert!(result.is_err());
        assert_eq!(
            STORE_OPERATIONS_TOTAL
                .with_label_values(&["metrics-test", "error"])
                .get(),
            before + 1
        );
    }
}
