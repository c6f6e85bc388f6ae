// src/store/memory.rs

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{DentistaRepository, PacienteRepository, StoreError, TurnoRepository};
use crate::models::{Dentista, Paciente, Turno};

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    turnos: RwLock<Table<Turno>>,
    pacientes: RwLock<Table<Paciente>>,
    dentistas: RwLock<Table<Dentista>>,
}

struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn get(&self, id: i64) -> Result<T, StoreError> {
        self.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn insert(&mut self, assign_id: impl FnOnce(&mut T, i64), mut row: T) -> T {
        self.last_id += 1;
        assign_id(&mut row, self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn replace(&mut self, id: i64, row: T) -> Result<T, StoreError> {
        let slot = self.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        *slot = row.clone();
        Ok(row)
    }

    fn remove(&mut self, id: i64) -> Result<(), StoreError> {
        self.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

// A panicked writer cannot leave a table half-updated, so poisoning is ignored.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl TurnoRepository for MemoryStore {
    async fn get_by_id(&self, id: i64) -> Result<Turno, StoreError> {
        read(&self.turnos).get(id)
    }

    async fn list_by_paciente(&self, paciente_id: &str) -> Result<Vec<Turno>, StoreError> {
        Ok(read(&self.turnos)
            .rows
            .values()
            .filter(|t| t.paciente_id == paciente_id)
            .cloned()
            .collect())
    }

    async fn create(&self, turno: Turno) -> Result<Turno, StoreError> {
        Ok(write(&self.turnos).insert(|t, id| t.id = id, turno))
    }

    async fn update(&self, id: i64, mut turno: Turno) -> Result<Turno, StoreError> {
        turno.id = id;
        write(&self.turnos).replace(id, turno)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        write(&self.turnos).remove(id)
    }
}

#[async_trait]
impl PacienteRepository for MemoryStore {
    async fn get_by_id(&self, id: i64) -> Result<Paciente, StoreError> {
        read(&self.pacientes).get(id)
    }

    async fn get_by_dni(&self, dni: f64) -> Result<Paciente, StoreError> {
        read(&self.pacientes)
            .rows
            .values()
            .find(|p| p.dni == dni)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, paciente: Paciente) -> Result<Paciente, StoreError> {
        let mut table = write(&self.pacientes);
        if table.rows.values().any(|p| p.dni == paciente.dni) {
            return Err(StoreError::Duplicate("paciente"));
        }
        Ok(table.insert(|p, id| p.id = id, paciente))
    }

    async fn update(&self, id: i64, mut paciente: Paciente) -> Result<Paciente, StoreError> {
        let mut table = write(&self.pacientes);
        if table.rows.values().any(|p| p.id != id && p.dni == paciente.dni) {
            return Err(StoreError::Duplicate("paciente"));
        }
        paciente.id = id;
        table.replace(id, paciente)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        write(&self.pacientes).remove(id)
    }
}

#[async_trait]
impl DentistaRepository for MemoryStore {
    async fn get_by_id(&self, id: i64) -> Result<Dentista, StoreError> {
        read(&self.dentistas).get(id)
    }

    async fn get_by_matricula(&self, matricula: &str) -> Result<Dentista, StoreError> {
        read(&self.dentistas)
            .rows
            .values()
            .find(|d| d.matricula == matricula)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, dentista: Dentista) -> Result<Dentista, StoreError> {
        let mut table = write(&self.dentistas);
        if table.rows.values().any(|d| d.matricula == dentista.matricula) {
            return Err(StoreError::Duplicate("dentista"));
        }
        Ok(table.insert(|d, id| d.id = id, dentista))
    }

    async fn update(&self, id: i64, mut dentista: Dentista) -> Result<Dentista, StoreError> {
        let mut table = write(&self.dentistas);
        if table
            .rows
            .values()
            .any(|d| d.id != id && d.matricula == dentista.matricula)
        {
            return Err(StoreError::Duplicate("dentista"));
        }
        dentista.id = id;
        table.replace(id, dentista)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        write(&self.dentistas).remove(id)
    }
}
