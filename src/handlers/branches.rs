// src/handlers/branches.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::Branch,
};

// O que o cliente precisa enviar para criar uma filial
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBranchPayload {
    #[validate(length(min = 1, message = "O nome da filial é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O endereço da filial é obrigatório."))]
    pub address: String,
}

// GET /api/branches: apenas as filiais do escopo do usuário
#[utoipa::path(
    get,
    path = "/api/branches",
    tag = "Branches",
    responses(
        (status = 200, description = "Filiais acessíveis ao usuário, por nome", body = Vec<Branch>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_branches(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let branches = app_state.branch_service.list_for_user(&user).await?;

    Ok((StatusCode::OK, Json(branches)))
}

// POST /api/branches
#[utoipa::path(
    post,
    path = "/api/branches",
    tag = "Branches",
    request_body = CreateBranchPayload,
    responses(
        (status = 201, description = "Filial criada", body = Branch),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateBranchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let branch = app_state
        .branch_service
        .create(&user, &payload.name, &payload.address)
        .await?;

    Ok((StatusCode::CREATED, Json(branch)))
}
