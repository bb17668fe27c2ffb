// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Branches ---
        handlers::branches::list_branches,
        handlers::branches::create_branch,

        // --- Hospitals ---
        handlers::hospitals::list_hospitals,
        handlers::hospitals::create_hospital,
        handlers::hospitals::update_hospital,
        handlers::hospitals::delete_hospital,

        // --- Patients ---
        handlers::patients::list_patients,
        handlers::patients::create_patient,

        // --- Shifts ---
        handlers::shifts::create_shift,

        // --- Dashboard ---
        handlers::dashboard::company_overview,
        handlers::dashboard::branches_overview,
        handlers::dashboard::branch_drilldown,
        handlers::dashboard::today_schedule,
        handlers::dashboard::urgent_queue,
        handlers::dashboard::top_hospitals,
        handlers::dashboard::schedule_range,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::AuthUser,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,

            // --- Tenancy ---
            models::tenancy::Company,
            models::tenancy::Branch,
            models::tenancy::UserBranch,

            // --- Directory ---
            models::directory::Hospital,
            models::directory::HospitalRef,

            // --- Scheduling ---
            models::scheduling::MeetingType,
            models::scheduling::Priority,
            models::scheduling::Patient,
            models::scheduling::Shift,

            // --- Dashboard ---
            models::dashboard::ScheduleWindowDto,
            models::dashboard::BranchMetrics,
            models::dashboard::ScopeInfo,
            models::dashboard::CompanyOverview,
            models::dashboard::BranchOverviewEntry,
            models::dashboard::TypeCount,
            models::dashboard::PriorityCount,
            models::dashboard::DrilldownBreakdown,
            models::dashboard::BranchDrilldown,
            models::dashboard::BranchRef,
            models::dashboard::ScheduleEntry,
            models::dashboard::TopHospitalEntry,

            // --- Payloads ---
            handlers::branches::CreateBranchPayload,
            handlers::hospitals::CreateHospitalPayload,
            handlers::hospitals::UpdateHospitalPayload,
            handlers::patients::CreatePatientPayload,
            handlers::shifts::CreateShiftPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e identidade da requisição"),
        (name = "Branches", description = "Filiais da empresa"),
        (name = "Hospitals", description = "Diretório de destinos (compartilhado pela empresa)"),
        (name = "Patients", description = "Pacientes por filial"),
        (name = "Shifts", description = "Agendamentos de transporte"),
        (name = "Dashboard", description = "Agregações e quadros de despacho")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
