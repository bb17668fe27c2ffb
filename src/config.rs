// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{BranchRepository, HospitalRepository, PatientRepository, ShiftRepository, UserRepository},
    services::{
        auth::AuthService,
        branch_service::BranchService,
        dashboard_service::{system_clock, DashboardService},
        hospital_service::HospitalService,
        patient_service::PatientService,
        shift_service::ShiftService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub branch_service: BranchService,
    pub hospital_service: HospitalService,
    pub patient_service: PatientService,
    pub shift_service: ShiftService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o grafo de serviços
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let branch_repo = BranchRepository::new(db_pool.clone());
        let hospital_repo = HospitalRepository::new(db_pool.clone());
        let patient_repo = PatientRepository::new(db_pool.clone());
        let shift_repo = ShiftRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let branch_service = BranchService::new(branch_repo.clone());
        let hospital_service = HospitalService::new(hospital_repo.clone());
        let patient_service = PatientService::new(branch_repo.clone(), patient_repo.clone());
        let shift_service = ShiftService::new(
            branch_repo.clone(),
            patient_repo.clone(),
            hospital_repo.clone(),
            shift_repo.clone(),
        );

        // O dashboard recebe o relógio do sistema; os testes injetam
        // instantes fixos no lugar dele.
        let dashboard_service = DashboardService::new(
            branch_repo,
            hospital_repo,
            patient_repo,
            shift_repo,
            system_clock(),
        );

        Ok(Self {
            db_pool,
            auth_service,
            branch_service,
            hospital_service,
            patient_service,
            shift_service,
            dashboard_service,
        })
    }
}
