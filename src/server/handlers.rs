use crate::core::entries::EntryLogic;
use crate::core::listing::{ListingLogic, ListingResponse};
use crate::core::query::QueryRequest;
use crate::models::{Entry, EntryInput};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use axum::Json;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusPatch {
    #[serde(default)]
    status: String,
}

pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// The query string is parsed leniently: bad numbers clamp, unknown sort
/// fields fall back, nothing is rejected.
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Json<ListingResponse>> {
    let request = QueryRequest::from_query_string(query.as_deref().unwrap_or(""), state.default_per_page);
    let pool = state.pool.lock().map_err(|_| ApiError::lock_poisoned())?;
    let response = ListingLogic::respond(&pool, &request, &state.list_path)?;
    tracing::debug!(
        total = response.entries.meta.total,
        page = response.entries.meta.current_page,
        "listing served"
    );
    Ok(Json(response))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<EntryInput>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    let mut pool = state.pool.lock().map_err(|_| ApiError::lock_poisoned())?;
    let entry = EntryLogic::create(&mut pool, &input)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Entry>> {
    let pool = state.pool.lock().map_err(|_| ApiError::lock_poisoned())?;
    Ok(Json(EntryLogic::show(&pool, id)?))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<EntryInput>,
) -> ApiResult<Json<Entry>> {
    let mut pool = state.pool.lock().map_err(|_| ApiError::lock_poisoned())?;
    Ok(Json(EntryLogic::replace(&mut pool, id, &input)?))
}

pub async fn patch_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> ApiResult<Json<Entry>> {
    let mut pool = state.pool.lock().map_err(|_| ApiError::lock_poisoned())?;
    Ok(Json(EntryLogic::patch_status(&mut pool, id, &patch.status)?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut pool = state.pool.lock().map_err(|_| ApiError::lock_poisoned())?;
    EntryLogic::delete(&mut pool, id)?;
    Ok(StatusCode::NO_CONTENT)
}
