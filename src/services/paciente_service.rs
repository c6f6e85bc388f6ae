use std::sync::Arc;

use super::{require, ServiceError};
use crate::models::Paciente;
use crate::store::PacienteRepository;

#[derive(Clone)]
pub struct PacienteService {
    pacientes: Arc<dyn PacienteRepository>,
}

impl PacienteService {
    pub fn new(pacientes: Arc<dyn PacienteRepository>) -> Self {
        Self { pacientes }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Paciente, ServiceError> {
        self.pacientes
            .get_by_id(id)
            .await
            .map_err(ServiceError::from_store("paciente"))
    }

    pub async fn get_by_dni(&self, dni: f64) -> Result<Paciente, ServiceError> {
        self.pacientes
            .get_by_dni(dni)
            .await
            .map_err(ServiceError::from_store("paciente"))
    }

    pub async fn create(&self, paciente: Paciente) -> Result<Paciente, ServiceError> {
        validate(&paciente)?;
        self.pacientes
            .create(paciente)
            .await
            .map_err(ServiceError::from_store("paciente"))
    }

    pub async fn update(&self, id: i64, paciente: Paciente) -> Result<Paciente, ServiceError> {
        validate(&paciente)?;
        self.pacientes
            .update(id, paciente)
            .await
            .map_err(ServiceError::from_store("paciente"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.pacientes
            .delete(id)
            .await
            .map_err(ServiceError::from_store("paciente"))
    }
}

fn validate(paciente: &Paciente) -> Result<(), ServiceError> {
    require(&paciente.nombre, "nombre")?;
    require(&paciente.apellido, "apellido")?;
    if !paciente.dni.is_finite() || paciente.dni <= 0.0 {
        return Err(ServiceError::Validation("dni must be a positive number".into()));
    }
    Ok(())
}
