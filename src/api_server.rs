// Axum server: application state, router and error mapping
//
// Pages: Home (/), Plant Details (/plants), Plant Database (/database)
// plus a JSON health check.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use askama::Template;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::PlantError;
use crate::service::PlantService;
use crate::web::handlers::pages::{self, ErrorFragmentTemplate, ErrorTemplate};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlantService>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, PlantError> {
        tracing::info!("Initializing plant service...");
        let service = PlantService::from_config(config)?;
        Ok(Self::from_service(service))
    }

    pub fn from_service(service: PlantService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Pages
        .route("/", get(pages::home_page))
        .route("/plants", get(pages::plant_details_page))
        .route("/database", get(pages::plant_database_page))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl From<PlantError> for AppError {
    fn from(err: PlantError) -> Self {
        match err {
            PlantError::InvalidName(_) => AppError::BadRequest(err.to_string()),
            PlantError::Provider(_)
            | PlantError::ProviderStatus { .. }
            | PlantError::EmptyCompletion => AppError::Upstream(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        }
        (status, message)
    }

    /// Error fragment for htmx requests, swapped into the result panel.
    pub fn into_fragment(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();
        let fragment = ErrorFragmentTemplate {
            status: status.as_u16(),
            message,
        };
        let body = fragment
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));

        (status, Html(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();

        let page = ErrorTemplate {
            title: "Something went wrong".to_string(),
            status: status.as_u16(),
            message,
        };
        let body = page
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));

        (status, Html(body)).into_response()
    }
}
