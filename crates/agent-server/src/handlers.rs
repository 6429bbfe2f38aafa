//! HTTP/SSE Handlers

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};

use agent_core::{AgentEvent, ToolInvocation};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub success: bool,
    pub run_id: String,
    pub summary: String,
    pub tool_calls: Vec<ToolInvocation>,
    pub results: Vec<serde_json::Value>,
    pub state: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
        model: state.assistant.model().to_string(),
    })
}

/// Process a transcript and return the full report (non-streaming)
pub async fn process_transcript(
    State(state): State<AppState>,
    Json(payload): Json<TranscriptRequest>,
) -> Result<Json<TranscriptResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.transcript.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Transcript must not be empty".into(),
                code: "EMPTY_TRANSCRIPT".into(),
            }),
        ));
    }

    let report = state
        .assistant
        .process_transcript(&payload.transcript)
        .await
        .map_err(|e| {
            tracing::error!("Transcript processing failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: user_message(&e),
                    code: "AGENT_ERROR".into(),
                }),
            )
        })?;

    Ok(Json(TranscriptResponse {
        success: true,
        run_id: report.run_id,
        summary: report.summary,
        tool_calls: report.tool_calls,
        results: report.results,
        state: report.state,
    }))
}

/// Process a transcript, streaming run events over SSE.
///
/// Events carry their `AgentEvent` kind as the SSE event name and the
/// serialized event as JSON data; `run_finished` or `run_failed` is always
/// the last data event on the stream.
pub async fn stream_transcript(
    State(state): State<AppState>,
    Json(payload): Json<TranscriptRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<AgentEvent>(64);

    let assistant = state.assistant.clone();
    tokio::spawn(async move {
        // Run errors surface on the stream as run_failed; nothing to return
        if let Err(e) = assistant
            .process_transcript_streaming(&payload.transcript, tx)
            .await
        {
            tracing::error!("Streaming run failed: {}", e);
        }
    });

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".into());
        Ok(Event::default().event(event.kind()).data(data))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

fn user_message(error: &meeting_assistant::AssistantError) -> String {
    match error {
        meeting_assistant::AssistantError::Agent(e) => e.user_message(),
        other => other.to_string(),
    }
}
