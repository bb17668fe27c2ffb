// src/handlers/dashboard.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{
        BranchDrilldown, BranchOverviewEntry, CompanyOverview, DashboardQuery, ScheduleEntry,
        ScheduleRangeQuery, TopHospitalEntry,
    },
};

// GET /api/dashboard: visão geral da empresa (cards do topo)
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contagens agregadas do escopo do usuário", body = CompanyOverview),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn company_overview(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.company_overview(&user).await?;

    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/dashboard/branches: uma linha de métricas por filial do escopo
#[utoipa::path(
    get,
    path = "/api/dashboard/branches",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Métricas por filial, ordenadas por nome", body = Vec<BranchOverviewEntry>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn branches_overview(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.dashboard_service.branches_overview(&user).await?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/dashboard/branches/{branch_id}: detalhe de uma filial
#[utoipa::path(
    get,
    path = "/api/dashboard/branches/{branch_id}",
    tag = "Dashboard",
    params(
        ("branch_id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 200, description = "Métricas e decomposição dos próximos 7 dias", body = BranchDrilldown),
        (status = 404, description = "Filial não encontrada ou fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn branch_drilldown(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let drilldown = app_state
        .dashboard_service
        .branch_drilldown(&user, branch_id)
        .await?;

    Ok((StatusCode::OK, Json(drilldown)))
}

// GET /api/dashboard/schedule/today: o quadro de despacho do dia
#[utoipa::path(
    get,
    path = "/api/dashboard/schedule/today",
    tag = "Dashboard",
    params(
        ("branchId" = Option<Uuid>, Query, description = "Restringe a uma filial do escopo")
    ),
    responses(
        (status = 200, description = "Agenda de hoje, URGENT primeiro", body = Vec<ScheduleEntry>),
        (status = 404, description = "Filial fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn today_schedule(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state
        .dashboard_service
        .today_schedule(&user, query.branch_id)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/dashboard/queue/urgent: urgências dos próximos 7 dias
#[utoipa::path(
    get,
    path = "/api/dashboard/queue/urgent",
    tag = "Dashboard",
    params(
        ("branchId" = Option<Uuid>, Query, description = "Restringe a uma filial do escopo")
    ),
    responses(
        (status = 200, description = "Fila de urgências por horário", body = Vec<ScheduleEntry>),
        (status = 404, description = "Filial fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn urgent_queue(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state
        .dashboard_service
        .urgent_queue(&user, query.branch_id)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/dashboard/top/hospitals: destinos mais usados nos próximos 30 dias
#[utoipa::path(
    get,
    path = "/api/dashboard/top/hospitals",
    tag = "Dashboard",
    params(
        ("branchId" = Option<Uuid>, Query, description = "Restringe a uma filial do escopo")
    ),
    responses(
        (status = 200, description = "Top 10 hospitais por volume de agendamentos", body = Vec<TopHospitalEntry>),
        (status = 404, description = "Filial fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn top_hospitals(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ranking = app_state
        .dashboard_service
        .top_hospitals(&user, query.branch_id)
        .await?;

    Ok((StatusCode::OK, Json(ranking)))
}

// GET /api/dashboard/schedule/range: agenda por período arbitrário
#[utoipa::path(
    get,
    path = "/api/dashboard/schedule/range",
    tag = "Dashboard",
    params(
        ("from" = String, Query, description = "Início do intervalo (instante ISO, inclusivo)"),
        ("to" = String, Query, description = "Fim do intervalo (instante ISO, exclusivo)"),
        ("branchId" = Option<Uuid>, Query, description = "Restringe a uma filial do escopo")
    ),
    responses(
        (status = 200, description = "Agenda do período, URGENT primeiro", body = Vec<ScheduleEntry>),
        (status = 400, description = "Intervalo ausente, inválido ou acima de 31 dias"),
        (status = 404, description = "Filial fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_range(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ScheduleRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Presença é checada aqui; formato e tamanho ficam com o validador.
    let from = query
        .from
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingRangeParam("from"))?;

    let to = query
        .to
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingRangeParam("to"))?;

    let entries = app_state
        .dashboard_service
        .schedule_range(&user, from, to, query.branch_id)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}
