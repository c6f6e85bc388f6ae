// src/routes/paciente_routes.rs

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};

use crate::{
    error::ApiError,
    middleware::{api_token::ApiToken, json_body::JsonBody},
    models::{AppState, Paciente, PatchPacienteRequest},
    routes::{parse_dni, parse_id, DniQuery},
    web::ApiOk,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pacientes", get(get_paciente_by_dni).post(create_paciente))
        .route(
            "/pacientes/{id}",
            get(get_paciente)
                .put(put_paciente)
                .patch(patch_paciente)
                .delete(delete_paciente),
        )
}

pub async fn get_paciente(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ApiOk<Paciente>, ApiError> {
    let id = parse_id(&raw_id)?;
    let paciente = state
        .pacientes
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "paciente not found"))?;
    Ok(ApiOk::ok(paciente))
}

pub async fn get_paciente_by_dni(
    State(state): State<AppState>,
    Query(q): Query<DniQuery>,
) -> Result<ApiOk<Paciente>, ApiError> {
    let dni = parse_dni(q.dni.as_deref())?;
    let paciente = state
        .pacientes
        .get_by_dni(dni)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "paciente not found"))?;
    Ok(ApiOk::ok(paciente))
}

pub async fn create_paciente(
    State(state): State<AppState>,
    _token: ApiToken,
    JsonBody(req): JsonBody<Paciente>,
) -> Result<ApiOk<Paciente>, ApiError> {
    let created = state
        .pacientes
        .create(req)
        .await
        .map_err(ApiError::create_failed)?;

    tracing::info!(paciente_id = created.id, "paciente created");
    Ok(ApiOk::created(created))
}

pub async fn delete_paciente(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .pacientes
        .delete(id)
        .await
        .map_err(ApiError::delete_failed)?;

    tracing::info!(paciente_id = id, "paciente deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn put_paciente(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiOk<Paciente>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .pacientes
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "paciente not found"))?;

    let paciente = JsonBody::<Paciente>::parse(&body)?;
    let updated = state
        .pacientes
        .update(id, paciente)
        .await
        .map_err(ApiError::update_failed)?;

    tracing::info!(paciente_id = id, "paciente replaced");
    Ok(ApiOk::ok(updated))
}

pub async fn patch_paciente(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiOk<Paciente>, ApiError> {
    let id = parse_id(&raw_id)?;
    let existing = state
        .pacientes
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "paciente not found"))?;

    let patch = JsonBody::<PatchPacienteRequest>::parse(&body)?;
    let updated = state
        .pacientes
        .update(id, patch.apply(existing))
        .await
        .map_err(ApiError::update_failed)?;

    tracing::info!(paciente_id = id, "paciente patched");
    Ok(ApiOk::ok(updated))
}
