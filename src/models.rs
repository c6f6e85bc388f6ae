use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::services::{DentistaService, PacienteService, TurnoService};
use crate::store::{DentistaRepository, PacienteRepository, TurnoRepository};

#[derive(Clone)]
pub struct AppState {
    pub turnos: TurnoService,
    pub pacientes: PacienteService,
    pub dentistas: DentistaService,
    pub api_token: Arc<str>,
}

impl AppState {
    /// Wire every service to one backing store.
    pub fn from_store<S>(store: Arc<S>, api_token: &str) -> Self
    where
        S: TurnoRepository + PacienteRepository + DentistaRepository + 'static,
    {
        let turnos: Arc<dyn TurnoRepository> = store.clone();
        let pacientes: Arc<dyn PacienteRepository> = store.clone();
        let dentistas: Arc<dyn DentistaRepository> = store;

        Self {
            turnos: TurnoService::new(turnos, pacientes.clone(), dentistas.clone()),
            pacientes: PacienteService::new(pacientes),
            dentistas: DentistaService::new(dentistas),
            api_token: Arc::from(api_token),
        }
    }
}

/* -------------------------
   Domain records
--------------------------*/

/// Appointment. Both references are stored as text ids of the linked records.
/// Request bodies must carry every field but `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Turno {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "fechaHora")]
    pub fecha_hora: String,
    pub descripcion: String,
    #[serde(rename = "paciente")]
    pub paciente_id: String,
    #[serde(rename = "odontologo")]
    pub dentista_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Paciente {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub domicilio: String,
    pub dni: f64,
    #[serde(rename = "fechaAlta")]
    pub fecha_alta: String,
}

/// All fields but `id` must be present in request bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Dentista {
    #[serde(default)]
    pub id: i64,
    pub apellido: String,
    pub nombre: String,
    pub matricula: String,
}

/* -------------------------
   Request shapes
--------------------------*/

/// Turno addressed by the paciente's DNI and the dentista's matrícula.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnoByMatriculaAndDni {
    pub dni: f64,
    pub matricula: String,
    #[serde(default, rename = "fechaHora")]
    pub fecha_hora: String,
    #[serde(default)]
    pub descripcion: String,
}

impl TurnoByMatriculaAndDni {
    pub fn into_turno(self, paciente: &Paciente, dentista: &Dentista) -> Turno {
        Turno {
            id: 0,
            fecha_hora: self.fecha_hora,
            descripcion: self.descripcion,
            paciente_id: paciente.id.to_string(),
            dentista_id: dentista.id.to_string(),
        }
    }
}

/// Body of `POST /turnos`. A body carrying `dni` or `matricula` is a
/// composite create; anything else binds as a plain turno.
#[derive(Debug, Clone)]
pub enum CreateTurnoRequest {
    ByDniAndMatricula(TurnoByMatriculaAndDni),
    Direct(Turno),
}

impl<'de> Deserialize<'de> for CreateTurnoRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let composite = value.get("dni").is_some() || value.get("matricula").is_some();

        // the shape is fixed by the keys, so a bad field never falls through
        if composite {
            serde_json::from_value(value)
                .map(CreateTurnoRequest::ByDniAndMatricula)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(CreateTurnoRequest::Direct)
                .map_err(de::Error::custom)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchTurnoRequest {
    #[serde(rename = "fechaHora")]
    pub fecha_hora: Option<String>,
    pub descripcion: Option<String>,
    #[serde(rename = "paciente")]
    pub paciente_id: Option<String>,
    #[serde(rename = "odontologo")]
    pub dentista_id: Option<String>,
}

impl PatchTurnoRequest {
    /// Absent or blank fields keep the stored value.
    pub fn apply(self, existing: Turno) -> Turno {
        Turno {
            id: existing.id,
            fecha_hora: keep_or_replace(self.fecha_hora, existing.fecha_hora),
            descripcion: keep_or_replace(self.descripcion, existing.descripcion),
            paciente_id: keep_or_replace(self.paciente_id, existing.paciente_id),
            dentista_id: keep_or_replace(self.dentista_id, existing.dentista_id),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchPacienteRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub domicilio: Option<String>,
    pub dni: Option<f64>,
    #[serde(rename = "fechaAlta")]
    pub fecha_alta: Option<String>,
}

impl PatchPacienteRequest {
    pub fn apply(self, existing: Paciente) -> Paciente {
        Paciente {
            id: existing.id,
            nombre: keep_or_replace(self.nombre, existing.nombre),
            apellido: keep_or_replace(self.apellido, existing.apellido),
            domicilio: keep_or_replace(self.domicilio, existing.domicilio),
            dni: self.dni.unwrap_or(existing.dni),
            fecha_alta: keep_or_replace(self.fecha_alta, existing.fecha_alta),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchDentistaRequest {
    pub apellido: Option<String>,
    pub nombre: Option<String>,
    pub matricula: Option<String>,
}

impl PatchDentistaRequest {
    pub fn apply(self, existing: Dentista) -> Dentista {
        Dentista {
            id: existing.id,
            apellido: keep_or_replace(self.apellido, existing.apellido),
            nombre: keep_or_replace(self.nombre, existing.nombre),
            matricula: keep_or_replace(self.matricula, existing.matricula),
        }
    }
}

fn keep_or_replace(update: Option<String>, current: String) -> String {
    match update.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => current,
    }
}
