// src/handlers/hospitals.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::directory::Hospital,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHospitalPayload {
    #[validate(length(min = 1, message = "O nome do hospital é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O endereço do hospital é obrigatório."))]
    pub address: String,
}

// Atualização parcial: campo ausente mantém o valor atual
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateHospitalPayload {
    pub name: Option<String>,
    pub address: Option<String>,
}

// GET /api/hospitals: lista mestre da empresa
#[utoipa::path(
    get,
    path = "/api/hospitals",
    tag = "Hospitals",
    responses(
        (status = 200, description = "Hospitais da empresa, por nome", body = Vec<Hospital>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_hospitals(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let hospitals = app_state.hospital_service.list(&user).await?;

    Ok((StatusCode::OK, Json(hospitals)))
}

// POST /api/hospitals
#[utoipa::path(
    post,
    path = "/api/hospitals",
    tag = "Hospitals",
    request_body = CreateHospitalPayload,
    responses(
        (status = 201, description = "Hospital criado", body = Hospital)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_hospital(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateHospitalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let hospital = app_state
        .hospital_service
        .create(&user, &payload.name, &payload.address)
        .await?;

    Ok((StatusCode::CREATED, Json(hospital)))
}

// PATCH /api/hospitals/{hospital_id}
#[utoipa::path(
    patch,
    path = "/api/hospitals/{hospital_id}",
    tag = "Hospitals",
    request_body = UpdateHospitalPayload,
    params(
        ("hospital_id" = Uuid, Path, description = "ID do hospital")
    ),
    responses(
        (status = 200, description = "Hospital atualizado", body = Hospital),
        (status = 404, description = "Hospital não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_hospital(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hospital_id): Path<Uuid>,
    Json(payload): Json<UpdateHospitalPayload>,
) -> Result<impl IntoResponse, AppError> {
    let hospital = app_state
        .hospital_service
        .update(
            &user,
            hospital_id,
            payload.name.as_deref(),
            payload.address.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(hospital)))
}

// DELETE /api/hospitals/{hospital_id}
#[utoipa::path(
    delete,
    path = "/api/hospitals/{hospital_id}",
    tag = "Hospitals",
    params(
        ("hospital_id" = Uuid, Path, description = "ID do hospital")
    ),
    responses(
        (status = 200, description = "Hospital removido"),
        (status = 404, description = "Hospital não encontrado"),
        (status = 409, description = "Hospital ainda referenciado por agendamentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_hospital(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(hospital_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.hospital_service.remove(&user, hospital_id).await?;

    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}
