use crate::store::StoreError;

pub mod dentista_service;
pub mod paciente_service;
pub mod turno_service;

pub use dentista_service::DentistaService;
pub use paciente_service::PacienteService;
pub use turno_service::TurnoService;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    pub(crate) fn from_store(entity: &'static str) -> impl Fn(StoreError) -> ServiceError {
        move |e| match e {
            StoreError::NotFound => ServiceError::NotFound(entity),
            StoreError::Duplicate(what) => ServiceError::Conflict(format!("{what} already exists")),
            StoreError::Database(msg) => ServiceError::Storage(msg),
        }
    }
}

pub(crate) fn require(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
