// src/handlers/shifts.rs

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
    models::scheduling::{MeetingType, Priority, Shift},
    services::shift_service::NewShift,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftPayload {
    pub patient_id: Uuid,
    pub start_time: String, // ISO
    pub end_time: String,   // ISO
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub meeting_type: Option<MeetingType>, // PHYSICAL | VIRTUAL
    pub priority: Option<Priority>, // NORMAL | URGENT
    pub hospital_id: Option<Uuid>,
}

// POST /api/branches/{branch_id}/shifts
#[utoipa::path(
    post,
    path = "/api/branches/{branch_id}/shifts",
    tag = "Shifts",
    request_body = CreateShiftPayload,
    params(
        ("branch_id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 201, description = "Agendamento criado", body = Shift),
        (status = 400, description = "Horários inválidos ou paciente de outra filial"),
        (status = 403, description = "Sem autorização para esta filial"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_shift(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<CreateShiftPayload>,
) -> Result<impl IntoResponse, AppError> {
    let shift = app_state
        .shift_service
        .create(
            &user,
            branch_id,
            NewShift {
                patient_id: payload.patient_id,
                start_time_raw: &payload.start_time,
                end_time_raw: &payload.end_time,
                notes: payload.notes.as_deref(),
                meeting_type: payload.meeting_type,
                priority: payload.priority,
                hospital_id: payload.hospital_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(shift)))
}
