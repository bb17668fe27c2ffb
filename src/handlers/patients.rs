// src/handlers/patients.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::scheduling::Patient,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    // Data pura (YYYY-MM-DD); validada no serviço
    pub date_of_birth: String,
}

// GET /api/branches/{branch_id}/patients
#[utoipa::path(
    get,
    path = "/api/branches/{branch_id}/patients",
    tag = "Patients",
    params(
        ("branch_id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 200, description = "Pacientes da filial", body = Vec<Patient>),
        (status = 403, description = "Sem autorização para esta filial"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_patients(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let patients = app_state.patient_service.list(&user, branch_id).await?;

    Ok((StatusCode::OK, Json(patients)))
}

// POST /api/branches/{branch_id}/patients
#[utoipa::path(
    post,
    path = "/api/branches/{branch_id}/patients",
    tag = "Patients",
    request_body = CreatePatientPayload,
    params(
        ("branch_id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 201, description = "Paciente criado", body = Patient),
        (status = 403, description = "Sem autorização para esta filial"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_patient(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<CreatePatientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let patient = app_state
        .patient_service
        .create(
            &user,
            branch_id,
            &payload.first_name,
            &payload.last_name,
            &payload.gender,
            &payload.date_of_birth,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(patient)))
}
