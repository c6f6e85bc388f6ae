use async_trait::async_trait;

use crate::models::{Dentista, Paciente, Turno};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("{0} already exists")]
    Duplicate(&'static str),
    #[error("{0}")]
    Database(String),
}

#[async_trait]
pub trait TurnoRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Turno, StoreError>;
    async fn list_by_paciente(&self, paciente_id: &str) -> Result<Vec<Turno>, StoreError>;
    async fn create(&self, turno: Turno) -> Result<Turno, StoreError>;
    async fn update(&self, id: i64, turno: Turno) -> Result<Turno, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PacienteRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Paciente, StoreError>;
    async fn get_by_dni(&self, dni: f64) -> Result<Paciente, StoreError>;
    async fn create(&self, paciente: Paciente) -> Result<Paciente, StoreError>;
    async fn update(&self, id: i64, paciente: Paciente) -> Result<Paciente, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DentistaRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Dentista, StoreError>;
    async fn get_by_matricula(&self, matricula: &str) -> Result<Dentista, StoreError>;
    async fn create(&self, dentista: Dentista) -> Result<Dentista, StoreError>;
    async fn update(&self, id: i64, dentista: Dentista) -> Result<Dentista, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
