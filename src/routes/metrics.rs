use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics: job counters, in-flight gauge and pipeline timings.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], handle.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn test_scrape_sets_exposition_content_type() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let response = prometheus_metrics(State(Arc::new(recorder.handle())))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            PROMETHEUS_CONTENT_TYPE
        );
    }
}
