// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DentistaRepository, PacienteRepository, StoreError, TurnoRepository};
use crate::models::{Dentista, Paciente, Turno};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations carry the table they hit; everything else is opaque.
fn db_err(entity: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(entity),
        _ => StoreError::Database(format!("{e}")),
    }
}

fn expect_deleted(rows_affected: u64) -> Result<(), StoreError> {
    if rows_affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

/* ============================================================
   turno
   ============================================================ */

#[async_trait]
impl TurnoRepository for PgStore {
    async fn get_by_id(&self, id: i64) -> Result<Turno, StoreError> {
        sqlx::query_as::<_, Turno>(
            r#"
            SELECT id, fecha_hora, descripcion, paciente_id, dentista_id
            FROM turno
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("turno"))?
        .ok_or(StoreError::NotFound)
    }

    async fn list_by_paciente(&self, paciente_id: &str) -> Result<Vec<Turno>, StoreError> {
        sqlx::query_as::<_, Turno>(
            r#"
            SELECT id, fecha_hora, descripcion, paciente_id, dentista_id
            FROM turno
            WHERE paciente_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(paciente_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("turno"))
    }

    async fn create(&self, turno: Turno) -> Result<Turno, StoreError> {
        sqlx::query_as::<_, Turno>(
            r#"
            INSERT INTO turno (fecha_hora, descripcion, paciente_id, dentista_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, fecha_hora, descripcion, paciente_id, dentista_id
            "#,
        )
        .bind(&turno.fecha_hora)
        .bind(&turno.descripcion)
        .bind(&turno.paciente_id)
        .bind(&turno.dentista_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("turno"))
    }

    async fn update(&self, id: i64, turno: Turno) -> Result<Turno, StoreError> {
        sqlx::query_as::<_, Turno>(
            r#"
            UPDATE turno
            SET fecha_hora = $2,
                descripcion = $3,
                paciente_id = $4,
                dentista_id = $5
            WHERE id = $1
            RETURNING id, fecha_hora, descripcion, paciente_id, dentista_id
            "#,
        )
        .bind(id)
        .bind(&turno.fecha_hora)
        .bind(&turno.descripcion)
        .bind(&turno.paciente_id)
        .bind(&turno.dentista_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("turno"))?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM turno WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("turno"))?;
        expect_deleted(res.rows_affected())
    }
}

/* ============================================================
   paciente
   ============================================================ */

#[async_trait]
impl PacienteRepository for PgStore {
    async fn get_by_id(&self, id: i64) -> Result<Paciente, StoreError> {
        sqlx::query_as::<_, Paciente>(
            r#"
            SELECT id, nombre, apellido, domicilio, dni, fecha_alta
            FROM paciente
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("paciente"))?
        .ok_or(StoreError::NotFound)
    }

    async fn get_by_dni(&self, dni: f64) -> Result<Paciente, StoreError> {
        sqlx::query_as::<_, Paciente>(
            r#"
            SELECT id, nombre, apellido, domicilio, dni, fecha_alta
            FROM paciente
            WHERE dni = $1
            "#,
        )
        .bind(dni)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("paciente"))?
        .ok_or(StoreError::NotFound)
    }

    async fn create(&self, paciente: Paciente) -> Result<Paciente, StoreError> {
        sqlx::query_as::<_, Paciente>(
            r#"
            INSERT INTO paciente (nombre, apellido, domicilio, dni, fecha_alta)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, nombre, apellido, domicilio, dni, fecha_alta
            "#,
        )
        .bind(&paciente.nombre)
        .bind(&paciente.apellido)
        .bind(&paciente.domicilio)
        .bind(paciente.dni)
        .bind(&paciente.fecha_alta)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("paciente"))
    }

    async fn update(&self, id: i64, paciente: Paciente) -> Result<Paciente, StoreError> {
        sqlx::query_as::<_, Paciente>(
            r#"
            UPDATE paciente
            SET nombre = $2,
                apellido = $3,
                domicilio = $4,
                dni = $5,
                fecha_alta = $6
            WHERE id = $1
            RETURNING id, nombre, apellido, domicilio, dni, fecha_alta
            "#,
        )
        .bind(id)
        .bind(&paciente.nombre)
        .bind(&paciente.apellido)
        .bind(&paciente.domicilio)
        .bind(paciente.dni)
        .bind(&paciente.fecha_alta)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("paciente"))?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM paciente WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("paciente"))?;
        expect_deleted(res.rows_affected())
    }
}

/* ============================================================
   dentista
   ============================================================ */

#[async_trait]
impl DentistaRepository for PgStore {
    async fn get_by_id(&self, id: i64) -> Result<Dentista, StoreError> {
        sqlx::query_as::<_, Dentista>(
            r#"
            SELECT id, apellido, nombre, matricula
            FROM dentista
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("dentista"))?
        .ok_or(StoreError::NotFound)
    }

    async fn get_by_matricula(&self, matricula: &str) -> Result<Dentista, StoreError> {
        sqlx::query_as::<_, Dentista>(
            r#"
            SELECT id, apellido, nombre, matricula
            FROM dentista
            WHERE matricula = $1
            "#,
        )
        .bind(matricula)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("dentista"))?
        .ok_or(StoreError::NotFound)
    }

    async fn create(&self, dentista: Dentista) -> Result<Dentista, StoreError> {
        sqlx::query_as::<_, Dentista>(
            r#"
            INSERT INTO dentista (apellido, nombre, matricula)
            VALUES ($1, $2, $3)
            RETURNING id, apellido, nombre, matricula
            "#,
        )
        .bind(&dentista.apellido)
        .bind(&dentista.nombre)
        .bind(&dentista.matricula)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("dentista"))
    }

    async fn update(&self, id: i64, dentista: Dentista) -> Result<Dentista, StoreError> {
        sqlx::query_as::<_, Dentista>(
            r#"
            UPDATE dentista
            SET apellido = $2,
                nombre = $3,
                matricula = $4
            WHERE id = $1
            RETURNING id, apellido, nombre, matricula
            "#,
        )
        .bind(id)
        .bind(&dentista.apellido)
        .bind(&dentista.nombre)
        .bind(&dentista.matricula)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("dentista"))?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM dentista WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("dentista"))?;
        expect_deleted(res.rows_affected())
    }
}
