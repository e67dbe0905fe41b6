use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use resume_fit::{
    app_state::AppState,
    config::AppConfig,
    routes,
    services::{
        embeddings::OpenAiEmbeddingClient,
        extractor::DocumentTextExtractor,
        job_store::JobStore,
        pipeline::{AnalysisPipeline, PipelineConfig, PipelineServices},
        reasoning::OpenAiReasoningClient,
        storage::UploadStorage,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env()?;
    let chunker = config.chunker()?;

    tracing::info!("Initializing resume-fit server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = Arc::new(PrometheusBuilder::new().install_recorder()?);

    metrics::describe_counter!(
        "resume_analysis_jobs_total",
        "Total resume analysis jobs submitted"
    );
    metrics::describe_counter!(
        "resume_analysis_jobs_completed",
        "Total resume analysis jobs completed"
    );
    metrics::describe_counter!(
        "resume_analysis_jobs_failed",
        "Total resume analysis jobs that failed"
    );
    metrics::describe_histogram!(
        "resume_analysis_processing_seconds",
        "Time to run the analysis pipeline for one job"
    );
    metrics::describe_gauge!(
        "resume_analysis_jobs_in_flight",
        "Jobs currently inside the analysis pipeline"
    );

    tracing::info!(
        base_url = %config.openai_base_url,
        embedding_model = %config.embedding_model,
        reasoning_model = %config.reasoning_model,
        "Initializing embedding and reasoning clients"
    );
    let services = PipelineServices {
        extractor: Arc::new(DocumentTextExtractor),
        embeddings: Arc::new(OpenAiEmbeddingClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.embedding_model,
        )),
        reasoning: Arc::new(OpenAiReasoningClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.reasoning_model,
        )),
    };

    // Jobs are held in memory only and are lost on restart
    let jobs = Arc::new(JobStore::new());
    let pipeline = Arc::new(AnalysisPipeline::new(
        services,
        Arc::clone(&jobs),
        PipelineConfig {
            chunker,
            reasoning_timeout: config.reasoning_timeout(),
        },
    ));

    let storage = UploadStorage::new(&config.upload_dir);
    tracing::info!(upload_dir = %storage.root().display(), "Upload storage ready");

    let state = AppState::new(
        jobs,
        storage,
        Arc::clone(&pipeline),
        &config.default_job_description,
    );

    let app = Router::new()
        .merge(routes::api_router(state))
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Waiting for in-flight analyses to finish");
    pipeline.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
