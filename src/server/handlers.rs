use super::AppState;
use crate::config::ExactMatchShape;
use crate::core::service::{Alive, Availability, MatchResult};
use crate::domain::ports::ReferenceStore;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::validate_min_length;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

pub const MIN_QUERY_LENGTH: usize = 2;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    fn required_query(&self) -> Result<&str> {
        let query = self
            .query
            .as_deref()
            .ok_or_else(|| LookupError::QueryParameterError {
                message: "Query parameter 'query' is required".to_string(),
            })?;
        validate_min_length("query", query, MIN_QUERY_LENGTH)?;
        Ok(query)
    }
}

pub async fn handle_search<S: ReferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let query = params.required_query()?;
    let result = state.service.lookup(query).await?;

    tracing::debug!(
        "Search '{}' matched {} entries (exact: {})",
        query,
        result.len(),
        result.is_exact()
    );

    let response = match (result, state.exact_match_shape) {
        (MatchResult::Exact(entry), ExactMatchShape::Object) => Json(entry).into_response(),
        (result, _) => Json(result).into_response(),
    };

    Ok(response)
}

pub async fn handle_search_head<S: ReferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Availability>> {
    let query = params.required_query()?;
    let availability = state.service.check_availability(query).await?;
    Ok(Json(availability))
}

/// Liveness probe for the uptime monitor; never touches the store.
pub async fn handle_health<S: ReferenceStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<Alive> {
    Json(state.service.ping())
}
