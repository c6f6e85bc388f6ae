use std::sync::Arc;

use super::{require, ServiceError};
use crate::models::Turno;
use crate::store::{DentistaRepository, PacienteRepository, StoreError, TurnoRepository};

#[derive(Clone)]
pub struct TurnoService {
    turnos: Arc<dyn TurnoRepository>,
    pacientes: Arc<dyn PacienteRepository>,
    dentistas: Arc<dyn DentistaRepository>,
}

impl TurnoService {
    pub fn new(
        turnos: Arc<dyn TurnoRepository>,
        pacientes: Arc<dyn PacienteRepository>,
        dentistas: Arc<dyn DentistaRepository>,
    ) -> Self {
        Self {
            turnos,
            pacientes,
            dentistas,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Turno, ServiceError> {
        self.turnos
            .get_by_id(id)
            .await
            .map_err(ServiceError::from_store("turno"))
    }

    /// Turnos of the paciente holding `dni`. An unknown DNI and a paciente
    /// without turnos both report not found.
    pub async fn get_by_dni(&self, dni: f64) -> Result<Vec<Turno>, ServiceError> {
        let paciente = self
            .pacientes
            .get_by_dni(dni)
            .await
            .map_err(ServiceError::from_store("paciente"))?;

        let turnos = self
            .turnos
            .list_by_paciente(&paciente.id.to_string())
            .await
            .map_err(ServiceError::from_store("turno"))?;

        if turnos.is_empty() {
            return Err(ServiceError::NotFound("turno"));
        }
        Ok(turnos)
    }

    /// References are checked here only; updates store them as given.
    pub async fn create(&self, turno: Turno) -> Result<Turno, ServiceError> {
        require(&turno.fecha_hora, "fechaHora")?;

        let paciente_id = parse_reference(&turno.paciente_id, "paciente")?;
        match self.pacientes.get_by_id(paciente_id).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => {
                return Err(ServiceError::Validation(format!(
                    "paciente {paciente_id} does not exist"
                )));
            }
            Err(e) => return Err(ServiceError::from_store("paciente")(e)),
        }

        let dentista_id = parse_reference(&turno.dentista_id, "odontologo")?;
        match self.dentistas.get_by_id(dentista_id).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => {
                return Err(ServiceError::Validation(format!(
                    "odontologo {dentista_id} does not exist"
                )));
            }
            Err(e) => return Err(ServiceError::from_store("dentista")(e)),
        }

        let turno = Turno {
            paciente_id: paciente_id.to_string(),
            dentista_id: dentista_id.to_string(),
            ..turno
        };
        self.turnos
            .create(turno)
            .await
            .map_err(ServiceError::from_store("turno"))
    }

    pub async fn update(&self, id: i64, turno: Turno) -> Result<Turno, ServiceError> {
        self.turnos
            .update(id, turno)
            .await
            .map_err(ServiceError::from_store("turno"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.turnos
            .delete(id)
            .await
            .map_err(ServiceError::from_store("turno"))
    }
}

fn parse_reference(raw: &str, field: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::Validation(format!("{field} must be a numeric id")))
}
