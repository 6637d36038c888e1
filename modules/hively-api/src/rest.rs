use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use hively_graph::resync;

use crate::AppState;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct RecommendQuery {
    limit: Option<usize>,
}

impl RecommendQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

pub async fn api_recommend_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<RecommendQuery>,
) -> impl IntoResponse {
    match state.reader.recommend_posts(user_id, params.limit()).await {
        Ok(recs) => Json(recs).into_response(),
        Err(e) => {
            warn!(error = %e, user_id = %user_id, "Failed to compute post recommendations");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn api_recommend_friends(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<RecommendQuery>,
) -> impl IntoResponse {
    match state.reader.recommend_friends(user_id, params.limit()).await {
        Ok(recs) => Json(recs).into_response(),
        Err(e) => {
            warn!(error = %e, user_id = %user_id, "Failed to compute friend recommendations");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Full rebuild of the graph from the primary store. Admin/recovery only.
pub async fn api_admin_resync(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Admin resync requested");
    match resync(state.store.as_ref(), &state.writer, &state.client).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            warn!(error = %e, "Resync failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
