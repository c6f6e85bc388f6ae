// src/routes/turno_routes.rs

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};

use crate::{
    error::ApiError,
    middleware::{api_token::ApiToken, json_body::JsonBody},
    models::{AppState, CreateTurnoRequest, PatchTurnoRequest, Turno, TurnoByMatriculaAndDni},
    routes::{parse_dni, parse_id, DniQuery},
    web::ApiOk,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/turnos", get(get_turnos_by_dni).post(create_turno))
        .route(
            "/turnos/{id}",
            get(get_turno)
                .put(put_turno)
                .patch(patch_turno)
                .delete(delete_turno),
        )
}

/* ============================================================
   GET /turnos/{id}
   ============================================================ */

pub async fn get_turno(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ApiOk<Turno>, ApiError> {
    let id = parse_id(&raw_id)?;
    let turno = state
        .turnos
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "turno not found"))?;
    Ok(ApiOk::ok(turno))
}

/* ============================================================
   GET /turnos?DNI=
   ============================================================ */

pub async fn get_turnos_by_dni(
    State(state): State<AppState>,
    Query(q): Query<DniQuery>,
) -> Result<ApiOk<Vec<Turno>>, ApiError> {
    let dni = parse_dni(q.dni.as_deref())?;
    let turnos = state
        .turnos
        .get_by_dni(dni)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "turno not found"))?;
    Ok(ApiOk::ok(turnos))
}

/* ============================================================
   POST /turnos
   ============================================================ */

pub async fn create_turno(
    State(state): State<AppState>,
    _token: ApiToken,
    JsonBody(req): JsonBody<CreateTurnoRequest>,
) -> Result<ApiOk<Turno>, ApiError> {
    let created = match req {
        CreateTurnoRequest::Direct(turno) => create_direct(&state, turno).await?,
        CreateTurnoRequest::ByDniAndMatricula(body) => {
            create_by_dni_and_matricula(&state, body).await?
        }
    };

    tracing::info!(
        turno_id = created.id,
        paciente = %created.paciente_id,
        odontologo = %created.dentista_id,
        "turno created"
    );
    Ok(ApiOk::created(created))
}

async fn create_direct(state: &AppState, turno: Turno) -> Result<Turno, ApiError> {
    state
        .turnos
        .create(turno)
        .await
        .map_err(ApiError::create_failed)
}

/// Both lookups must succeed before anything is written.
async fn create_by_dni_and_matricula(
    state: &AppState,
    body: TurnoByMatriculaAndDni,
) -> Result<Turno, ApiError> {
    let paciente = state
        .pacientes
        .get_by_dni(body.dni)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "paciente not found"))?;

    let dentista = state
        .dentistas
        .get_by_matricula(&body.matricula)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "odontologo not found"))?;

    create_direct(state, body.into_turno(&paciente, &dentista)).await
}

/* ============================================================
   DELETE /turnos/{id}
   ============================================================ */

pub async fn delete_turno(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .turnos
        .delete(id)
        .await
        .map_err(ApiError::delete_failed)?;

    tracing::info!(turno_id = id, "turno deleted");
    Ok(StatusCode::NO_CONTENT)
}

/* ============================================================
   PUT /turnos/{id}
   ============================================================ */

pub async fn put_turno(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiOk<Turno>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .turnos
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "turno not found"))?;

    let turno = JsonBody::<Turno>::parse(&body)?;
    let updated = state
        .turnos
        .update(id, turno)
        .await
        .map_err(ApiError::update_failed)?;

    tracing::info!(turno_id = id, "turno replaced");
    Ok(ApiOk::ok(updated))
}

/* ============================================================
   PATCH /turnos/{id}
   ============================================================ */

pub async fn patch_turno(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiOk<Turno>, ApiError> {
    let id = parse_id(&raw_id)?;
    let existing = state
        .turnos
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::lookup_failed(e, "turno not found"))?;

    let patch = JsonBody::<PatchTurnoRequest>::parse(&body)?;
    let updated = state
        .turnos
        .update(id, patch.apply(existing))
        .await
        .map_err(ApiError::update_failed)?;

    tracing::info!(turno_id = id, "turno patched");
    Ok(ApiOk::ok(updated))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn get_by_id_returns_envelope() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;

        let (status, body) = send(&state, request("GET", &format!("/turnos/{}", t.id), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 200);
        assert_eq!(body["data"]["id"], t.id);
        assert_eq!(body["data"]["fechaHora"], "2024-05-10 10:30");
        assert_eq!(body["data"]["paciente"], p.id.to_string());
        assert_eq!(body["data"]["odontologo"], d.id.to_string());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = test_state();
        let (status, body) = send(&state, request("GET", "/turnos/404", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "turno not found");
    }

    #[tokio::test]
    async fn non_integer_ids_are_bad_requests() {
        let state = test_state();
        let token = Some(TEST_TOKEN);
        for raw in ["abc", "1.5", "1e3", "%20", "%201", "1%20"] {
            let uri = format!("/turnos/{raw}");
            let cases = [
                request("GET", &uri, None, None),
                request("DELETE", &uri, token, None),
                request("PUT", &uri, token, Some(json!({}))),
                request("PATCH", &uri, token, Some(json!({}))),
            ];
            for req in cases {
                let method = req.method().clone();
                let (status, body) = send(&state, req).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
                assert_eq!(body["message"], "invalid id");
            }
        }
    }

    #[tokio::test]
    async fn mutations_require_token() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;
        let uri = format!("/turnos/{}", t.id);
        let payload = json!({
            "fechaHora": "2024-06-01 09:00",
            "descripcion": "cambio",
            "paciente": p.id.to_string(),
            "odontologo": d.id.to_string(),
        });

        for (token, message) in [(None, "token not found"), (Some("wrong"), "invalid token")] {
            let cases = [
                request("POST", "/turnos", token, Some(payload.clone())),
                request("PUT", &uri, token, Some(payload.clone())),
                request("PATCH", &uri, token, Some(json!({"descripcion": "x"}))),
                request("DELETE", &uri, token, None),
            ];
            for req in cases {
                let (status, body) = send(&state, req).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body["message"], message);
            }
        }

        // nothing was touched
        assert_eq!(state.turnos.get_by_id(t.id).await.unwrap(), t);
        assert!(state.turnos.get_by_id(t.id + 1).await.is_err());
    }

    #[tokio::test]
    async fn token_is_checked_before_the_id() {
        let state = test_state();
        let (status, _) = send(&state, request("DELETE", "/turnos/abc", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_echoes_input() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;

        let payload = json!({
            "fechaHora": "2024-05-10 10:30",
            "descripcion": "control anual",
            "paciente": p.id.to_string(),
            "odontologo": d.id.to_string(),
        });
        let (status, body) = send(&state, request("POST", "/turnos", Some(TEST_TOKEN), Some(payload))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], 201);
        assert_eq!(body["data"]["fechaHora"], "2024-05-10 10:30");
        assert_eq!(body["data"]["descripcion"], "control anual");
        assert_eq!(body["data"]["paciente"], p.id.to_string());
        assert_eq!(body["data"]["odontologo"], d.id.to_string());
        assert!(body["data"]["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn create_with_unknown_reference_is_bad_request() {
        let state = test_state();
        let d = seed_dentista(&state, "MP-10").await;
        let payload = json!({
            "fechaHora": "2024-05-10 10:30",
            "descripcion": "x",
            "paciente": "77",
            "odontologo": d.id.to_string(),
        });
        let (status, body) = send(&state, request("POST", "/turnos", Some(TEST_TOKEN), Some(payload))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "paciente 77 does not exist");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let state = test_state();
        let (status, body) = send(&state, raw_request("POST", "/turnos", Some(TEST_TOKEN), "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid json");
    }

    #[tokio::test]
    async fn composite_create_resolves_dni_and_matricula() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;

        let payload = json!({
            "dni": 30111222,
            "matricula": "MP-10",
            "fechaHora": "2024-05-10 10:30",
            "descripcion": "ortodoncia",
        });
        let (status, body) = send(&state, request("POST", "/turnos", Some(TEST_TOKEN), Some(payload))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["paciente"], p.id.to_string());
        assert_eq!(body["data"]["odontologo"], d.id.to_string());
        assert_eq!(body["data"]["descripcion"], "ortodoncia");
    }

    #[tokio::test]
    async fn composite_create_stops_at_unknown_dni_or_matricula() {
        let state = test_state();
        seed_paciente(&state, 30111222.0).await;
        seed_dentista(&state, "MP-10").await;

        let unknown_dni = json!({"dni": 1, "matricula": "MP-10", "fechaHora": "2024-05-10 10:30"});
        let (status, body) = send(&state, request("POST", "/turnos", Some(TEST_TOKEN), Some(unknown_dni))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "paciente not found");

        let unknown_matricula =
            json!({"dni": 30111222, "matricula": "MP-99", "fechaHora": "2024-05-10 10:30"});
        let (status, body) =
            send(&state, request("POST", "/turnos", Some(TEST_TOKEN), Some(unknown_matricula))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "odontologo not found");

        // no turno was written for the paciente
        let (status, _) = send(&state, request("GET", "/turnos?DNI=30111222", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(state.turnos.get_by_id(1).await.is_err());
    }

    #[tokio::test]
    async fn get_by_dni_lists_paciente_turnos() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        seed_turno(&state, &p, &d).await;
        seed_turno(&state, &p, &d).await;

        let (status, body) = send(&state, request("GET", "/turnos?DNI=30111222", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_by_dni_rejects_bad_or_missing_dni() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        seed_turno(&state, &p, &d).await;

        for uri in ["/turnos?DNI=abc", "/turnos", "/turnos?DNI=%2030111222"] {
            let (status, body) = send(&state, request("GET", uri, None, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "invalid DNI");
        }

        let (status, _) = send(&state, request("GET", "/turnos?DNI=123", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_and_then_reports_not_found() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;
        let uri = format!("/turnos/{}", t.id);

        let (status, body) = send(&state, request("DELETE", &uri, Some(TEST_TOKEN), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = send(&state, request("DELETE", &uri, Some(TEST_TOKEN), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn put_replaces_whole_record() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;

        let payload = json!({
            "fechaHora": "2024-07-01 08:00",
            "descripcion": "reprogramado",
            "paciente": p.id.to_string(),
            "odontologo": d.id.to_string(),
        });
        let (status, body) =
            send(&state, request("PUT", &format!("/turnos/{}", t.id), Some(TEST_TOKEN), Some(payload))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], t.id);
        assert_eq!(body["data"]["fechaHora"], "2024-07-01 08:00");
        assert_eq!(body["data"]["descripcion"], "reprogramado");
    }

    #[tokio::test]
    async fn put_checks_existence_before_body() {
        let state = test_state();
        let (status, _) = send(&state, raw_request("PUT", "/turnos/9", Some(TEST_TOKEN), "{oops")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;
        let (status, body) =
            send(&state, raw_request("PUT", &format!("/turnos/{}", t.id), Some(TEST_TOKEN), "{oops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid json");
    }

    #[tokio::test]
    async fn put_without_every_field_is_bad_request() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;
        let uri = format!("/turnos/{}", t.id);

        let partial = json!({"descripcion": "solo esto"});
        for body in [json!({}), partial] {
            let (status, resp) = send(&state, request("PUT", &uri, Some(TEST_TOKEN), Some(body))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["message"], "invalid json");
        }

        // the stored turno still belongs to its paciente
        assert_eq!(state.turnos.get_by_id(t.id).await.unwrap(), t);
        let (status, _) = send(&state, request("GET", "/turnos?DNI=30111222", None, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn composite_create_with_mistyped_dni_is_invalid_json() {
        let state = test_state();
        seed_paciente(&state, 30111222.0).await;
        seed_dentista(&state, "MP-10").await;

        let payload = json!({
            "dni": "30111222",
            "matricula": "MP-10",
            "fechaHora": "2024-05-10 10:30",
        });
        let (status, body) = send(&state, request("POST", "/turnos", Some(TEST_TOKEN), Some(payload))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid json");
        assert!(state.turnos.get_by_id(1).await.is_err());
    }

    #[tokio::test]
    async fn patch_with_only_descripcion_keeps_the_rest() {
        let state = test_state();
        let p = seed_paciente(&state, 30111222.0).await;
        let d = seed_dentista(&state, "MP-10").await;
        let t = seed_turno(&state, &p, &d).await;

        let (status, body) = send(
            &state,
            request(
                "PATCH",
                &format!("/turnos/{}", t.id),
                Some(TEST_TOKEN),
                Some(json!({"descripcion": "extraccion"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["descripcion"], "extraccion");
        assert_eq!(body["data"]["fechaHora"], t.fecha_hora);
        assert_eq!(body["data"]["paciente"], t.paciente_id);
        assert_eq!(body["data"]["odontologo"], t.dentista_id);

        let stored = state.turnos.get_by_id(t.id).await.unwrap();
        assert_eq!(stored.fecha_hora, t.fecha_hora);
    }

    #[tokio::test]
    async fn patch_of_missing_turno_is_not_found() {
        let state = test_state();
        let (status, body) = send(
            &state,
            request("PATCH", "/turnos/5", Some(TEST_TOKEN), Some(json!({"descripcion": "x"}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "turno not found");
    }
}
