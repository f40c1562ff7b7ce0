//! Endpoint handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::http::response::{HealthResponse, LanguagesResponse, RejectionResponse};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Query string of `GET /no`.
#[derive(Debug, Default, Deserialize)]
pub struct RejectionQuery {
    pub lang: Option<String>,
}

/// `GET /no`: one random reason, in the requested language when supported.
///
/// A query string that does not deserialize (e.g. a repeated `lang`) is
/// treated as no selector at all.
pub async fn get_rejection(
    State(state): State<AppState>,
    query: Result<Query<RejectionQuery>, QueryRejection>,
) -> Json<RejectionResponse> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable query, using default language");
            RejectionQuery::default()
        }
    };
    let picked = state.store.pick(query.lang.as_deref());
    tracing::debug!(requested = ?query.lang, lang = picked.lang, "Serving rejection");
    metrics::record_rejection(picked.lang);
    Json(picked.into())
}

/// `GET /languages`: supported codes and their display names.
pub async fn get_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    Json(state.store.languages().collect())
}

/// `GET /health`: liveness.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        languages: state.store.languages().count(),
    })
}
