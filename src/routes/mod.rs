use crate::error::ApiError;
use crate::models::AppState;
use axum::Router;
use serde::Deserialize;

pub mod dentista_routes;
pub mod paciente_routes;
pub mod turno_routes;

#[cfg(test)]
pub(crate) mod test_support;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(turno_routes::router())
        .merge(paciente_routes::router())
        .merge(dentista_routes::router())
        .with_state(state)
}

/// Path ids arrive as text so a non-integer yields our 400 envelope
/// instead of axum's plain-text rejection. Padding is not stripped.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::invalid_id())
}

/// `?DNI=` lookup shared by the turno and paciente routers.
#[derive(Debug, Deserialize)]
pub struct DniQuery {
    #[serde(rename = "DNI")]
    pub dni: Option<String>,
}

pub(crate) fn parse_dni(raw: Option<&str>) -> Result<f64, ApiError> {
    raw.and_then(|s| s.parse::<f64>().ok())
        .filter(|dni| dni.is_finite())
        .ok_or_else(|| ApiError::BadRequest("invalid DNI".into()))
}
