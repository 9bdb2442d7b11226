use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::debug;

use crate::catalog::Party;
use crate::models::AppState;
use crate::types::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/parties", get(list_parties))
        .route("/api/parties/{party_id}", get(get_party))
}

async fn list_parties(State(state): State<AppState>) -> Json<Vec<Party>> {
    Json(state.catalog.all().to_vec())
}

async fn get_party(
    State(state): State<AppState>,
    Path(party_id): Path<i64>,
) -> AppResult<Json<Party>> {
    debug!(party_id, "Party lookup");

    u32::try_from(party_id)
        .ok()
        .and_then(|id| state.catalog.get(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Party not found".to_string()))
}
