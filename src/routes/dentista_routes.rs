// src/routes/dentista_routes.rs

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{
    error::ApiError,
    middleware::{api_token::ApiToken, json_body::JsonBody},
    models::{AppState, Dentista, PatchDentistaRequest},
    routes::parse_id,
    web::ApiOk,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dentistas", get(get_dentista_by_matricula).post(create_dentista))
        .route(
            "/dentistas/{id}",
            get(get_dentista)
                .put(put_dentista)
                .patch(patch_dentista)
                .delete(delete_dentista),
        )
}

#[derive(Debug, Deserialize)]
pub struct MatriculaQuery {
    pub matricula: Option<String>,
}

pub async fn get_dentista(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ApiOk<Dentista>, ApiError> {
    let id = parse_id(&raw_id)?;
    let dentista = state
        .dentistas
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "dentista not found"))?;
    Ok(ApiOk::ok(dentista))
}

pub async fn get_dentista_by_matricula(
    State(state): State<AppState>,
    Query(q): Query<MatriculaQuery>,
) -> Result<ApiOk<Dentista>, ApiError> {
    let matricula = q
        .matricula
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("invalid matricula".into()))?;

    let dentista = state
        .dentistas
        .get_by_matricula(matricula)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "dentista not found"))?;
    Ok(ApiOk::ok(dentista))
}

pub async fn create_dentista(
    State(state): State<AppState>,
    _token: ApiToken,
    JsonBody(req): JsonBody<Dentista>,
) -> Result<ApiOk<Dentista>, ApiError> {
    let created = state
        .dentistas
        .create(req)
        .await
        .map_err(ApiError::create_failed)?;

    tracing::info!(dentista_id = created.id, matricula = %created.matricula, "dentista created");
    Ok(ApiOk::created(created))
}

pub async fn delete_dentista(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .dentistas
        .delete(id)
        .await
        .map_err(ApiError::delete_failed)?;

    tracing::info!(dentista_id = id, "dentista deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn put_dentista(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiOk<Dentista>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .dentistas
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "dentista not found"))?;

    let dentista = JsonBody::<Dentista>::parse(&body)?;
    let updated = state
        .dentistas
        .update(id, dentista)
        .await
        .map_err(ApiError::update_failed)?;

    tracing::info!(dentista_id = id, "dentista replaced");
    Ok(ApiOk::ok(updated))
}

pub async fn patch_dentista(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiOk<Dentista>, ApiError> {
    let id = parse_id(&raw_id)?;
    let existing = state
        .dentistas
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "dentista not found"))?;

    let patch = JsonBody::<PatchDentistaRequest>::parse(&body)?;
    let updated = state
        .dentistas
        .update(id, patch.apply(existing))
        .await
        .map_err(ApiError::update_failed)?;

    tracing::info!(dentista_id = id, "dentista patched");
    Ok(ApiOk::ok(updated))
}
