//! Meeting Agent HTTP Server
//!
//! Axum-based server exposing the meeting transcript assistant: a JSON
//! endpoint for one-shot processing and an SSE endpoint that streams run
//! events and state snapshots to the frontend.

mod handlers;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::OpenAiProvider;
use meeting_assistant::MeetingAssistant;

use crate::handlers::{health_check, process_transcript, stream_transcript};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::from_env());

    // Verify provider connection
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to LLM provider"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ LLM provider not reachable - agent runs will fail");
            tracing::warn!("  Check LLM_BASE_URL and LLM_API_KEY in .env");
        }
    }

    let model =
        std::env::var("LLM_MODEL").unwrap_or_else(|_| "anthropic/claude-sonnet-4-5".into());

    // Document output directory (unset = keep documents in memory only)
    let output_dir = std::env::var("OUTPUT_DIR").ok().map(PathBuf::from);
    match &output_dir {
        Some(dir) => tracing::info!("Documents will be written to {}", dir.display()),
        None => tracing::info!("OUTPUT_DIR not set - documents returned inline only"),
    }

    // Build the assistant service
    let assistant = Arc::new(
        MeetingAssistant::with_document_executors(provider.clone(), output_dir)
            .with_model(model.clone()),
    );
    tracing::info!("Meeting assistant ready (model: {})", model);
    tracing::info!("Registered tools:");
    for name in MeetingAssistant::tool_names() {
        tracing::info!("  • {}", name);
    }

    // Build application state
    let app_state = AppState {
        provider,
        assistant,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/transcripts", post(process_transcript))
        .route("/api/transcripts/stream", post(stream_transcript))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 meeting-agent server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  POST /api/transcripts         - Process a transcript");
    tracing::info!("  POST /api/transcripts/stream  - Process with SSE streaming");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
