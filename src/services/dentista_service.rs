use std::sync::Arc;

use super::{require, ServiceError};
use crate::models::Dentista;
use crate::store::DentistaRepository;

#[derive(Clone)]
pub struct DentistaService {
    dentistas: Arc<dyn DentistaRepository>,
}

impl DentistaService {
    pub fn new(dentistas: Arc<dyn DentistaRepository>) -> Self {
        Self { dentistas }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Dentista, ServiceError> {
        self.dentistas
            .get_by_id(id)
            .await
            .map_err(ServiceError::from_store("dentista"))
    }

    pub async fn get_by_matricula(&self, matricula: &str) -> Result<Dentista, ServiceError> {
        self.dentistas
            .get_by_matricula(matricula.trim())
            .await
            .map_err(ServiceError::from_store("dentista"))
    }

    pub async fn create(&self, dentista: Dentista) -> Result<Dentista, ServiceError> {
        let dentista = normalize(dentista)?;
        self.dentistas
            .create(dentista)
            .await
            .map_err(ServiceError::from_store("dentista"))
    }

    pub async fn update(&self, id: i64, dentista: Dentista) -> Result<Dentista, ServiceError> {
        let dentista = normalize(dentista)?;
        self.dentistas
            .update(id, dentista)
            .await
            .map_err(ServiceError::from_store("dentista"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.dentistas
            .delete(id)
            .await
            .map_err(ServiceError::from_store("dentista"))
    }
}

fn normalize(dentista: Dentista) -> Result<Dentista, ServiceError> {
    require(&dentista.apellido, "apellido")?;
    require(&dentista.nombre, "nombre")?;
    require(&dentista.matricula, "matricula")?;
    Ok(Dentista {
        matricula: dentista.matricula.trim().to_string(),
        ..dentista
    })
}
