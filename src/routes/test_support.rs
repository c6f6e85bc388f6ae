use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::models::{AppState, Dentista, Paciente, Turno};
use crate::store::MemoryStore;

pub const TEST_TOKEN: &str = "test-token";

pub fn test_state() -> AppState {
    AppState::from_store(Arc::new(MemoryStore::default()), TEST_TOKEN)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    match body {
        Some(json) => raw_request(method, uri, token, &json.to_string()),
        None => {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("TOKEN", token);
            }
            builder.body(Body::empty()).unwrap()
        }
    }
}

pub fn raw_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("TOKEN", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Run one request through a fresh router over `state`.
pub async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
    let response = super::router(state.clone()).oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn seed_paciente(state: &AppState, dni: f64) -> Paciente {
    state
        .pacientes
        .create(Paciente {
            id: 0,
            nombre: "Juan".into(),
            apellido: "Lopez".into(),
            domicilio: "Av. Siempre Viva 742".into(),
            dni,
            fecha_alta: "2024-01-02".into(),
        })
        .await
        .unwrap()
}

pub async fn seed_dentista(state: &AppState, matricula: &str) -> Dentista {
    state
        .dentistas
        .create(Dentista {
            id: 0,
            apellido: "Gomez".into(),
            nombre: "Laura".into(),
            matricula: matricula.into(),
        })
        .await
        .unwrap()
}

pub async fn seed_turno(state: &AppState, paciente: &Paciente, dentista: &Dentista) -> Turno {
    state
        .turnos
        .create(Turno {
            id: 0,
            fecha_hora: "2024-05-10 10:30".into(),
            descripcion: "limpieza".into(),
            paciente_id: paciente.id.to_string(),
            dentista_id: dentista.id.to_string(),
        })
        .await
        .unwrap()
}
