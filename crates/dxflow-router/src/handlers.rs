//! HTTP request handlers for the Router service.
//!
//! Exposes note analysis, the latest stored result and a health check.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use dxflow_domain::traits::LlmProvider;
use dxflow_domain::AnalysisResult;
use dxflow_extractor::{AnalysisSession, AnalyzerError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
pub struct AppState<L>
where
    L: LlmProvider,
{
    /// Session holding the analyzer and the latest result
    pub session: Arc<AnalysisSession<L>>,
}

impl<L> AppState<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Wrap a session for sharing across handlers
    pub fn new(session: AnalysisSession<L>) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}

// Manual impl: derive would require `L: Clone`
impl<L: LlmProvider> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

/// Analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Free-text clinical note
    pub note: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Whether analyses consult the inference provider
    pub inference_enabled: bool,
    /// Configured model, if any
    pub model: Option<String>,
    /// Submissions accepted so far
    pub generation: u64,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Analysis rejected or superseded
    Analysis(AnalyzerError),
    /// No analysis has completed yet
    NoAnalysis,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Analysis(e) => {
                let status = match e {
                    AnalyzerError::EmptyNote | AnalyzerError::NoteTooLong(_, _) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    AnalyzerError::Superseded => StatusCode::CONFLICT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            AppError::NoAnalysis => (StatusCode::NOT_FOUND, "No analysis available".to_string()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<AnalyzerError> for AppError {
    fn from(e: AnalyzerError) -> Self {
        AppError::Analysis(e)
    }
}

/// POST /analyze - Analyze a note, superseding any analysis in flight
async fn analyze<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    match state.session.submit(&request.note).await {
        Ok(result) => {
            info!(
                "Served analysis {} ({} nodes)",
                result.metadata.analysis_id,
                result.nodes.len()
            );
            Ok(Json(result))
        }
        Err(e) => {
            warn!("Analysis request failed: {}", e);
            Err(e.into())
        }
    }
}

/// GET /analysis/latest - Most recent completed analysis
async fn latest_analysis<L>(
    State(state): State<AppState<L>>,
) -> Result<Json<AnalysisResult>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    state.session.latest().map(Json).ok_or(AppError::NoAnalysis)
}

/// GET /health - Service health
async fn health_check<L>(State(state): State<AppState<L>>) -> Json<HealthCheckResponse>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let analyzer = state.session.analyzer();
    let inference_enabled = analyzer.inference_enabled();

    Json(HealthCheckResponse {
        status: if inference_enabled { "healthy" } else { "degraded" }.to_string(),
        inference_enabled,
        model: analyzer.model_name().map(str::to_string),
        generation: state.session.generation(),
    })
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>) -> AxumRouter
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    AxumRouter::new()
        .route("/analyze", post(analyze::<L>))
        .route("/analysis/latest", get(latest_analysis::<L>))
        .route("/health", get(health_check::<L>))
        .with_state(state)
}
