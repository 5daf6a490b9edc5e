//! HTTP boundary for the lookup service.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /search?query=` | full search, JSON array of entries |
//! | `HEAD /search?query=` | availability probe |
//! | `GET /health` | liveness probe |
//!
//! Errors are written as `{"detail": "..."}` with 400 (invalid term),
//! 404 (no match), 422 (missing or short parameter) or 500 (store failure).

pub mod handlers;

use crate::config::ExactMatchShape;
use crate::core::service::LookupService;
use crate::domain::ports::ReferenceStore;
use crate::utils::error::{ErrorCategory, LookupError, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use handlers::{handle_health, handle_search, handle_search_head};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState<S: ReferenceStore> {
    pub service: Arc<LookupService<S>>,
    pub exact_match_shape: ExactMatchShape,
}

impl<S: ReferenceStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            exact_match_shape: self.exact_match_shape,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl LookupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            LookupError::QueryParameterError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LookupError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lookup => {
                tracing::debug!("Request rejected ({}): {}", status, self)
            }
            category => tracing::error!(
                "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
                self,
                category,
                self.severity()
            ),
        }

        let body = ErrorBody {
            detail: self.user_friendly_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router<S: ReferenceStore + 'static>(
    service: Arc<LookupService<S>>,
    exact_match_shape: ExactMatchShape,
) -> Router {
    Router::new()
        .route(
            "/search",
            get(handle_search::<S>).head(handle_search_head::<S>),
        )
        .route("/health", get(handle_health::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            service,
            exact_match_shape,
        })
}

/// Serves until Ctrl-C or SIGTERM, then drains in-flight requests.
pub async fn serve(app: Router, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("🚀 HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
