//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger (RUST_LOG controla o nível; padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Identidade da requisição (protegida)
    let me_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Filiais + recursos aninhados por filial (pacientes e agendamentos)
    let branch_routes = Router::new()
        .route(
            "/",
            get(handlers::branches::list_branches).post(handlers::branches::create_branch),
        )
        .route(
            "/{branch_id}/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route("/{branch_id}/shifts", post(handlers::shifts::create_shift))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Diretório de hospitais da empresa
    let hospital_routes = Router::new()
        .route(
            "/",
            get(handlers::hospitals::list_hospitals).post(handlers::hospitals::create_hospital),
        )
        .route(
            "/{hospital_id}",
            axum::routing::patch(handlers::hospitals::update_hospital)
                .delete(handlers::hospitals::delete_hospital),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // As sete visões do dashboard
    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::company_overview))
        .route("/branches", get(handlers::dashboard::branches_overview))
        .route("/branches/{branch_id}", get(handlers::dashboard::branch_drilldown))
        .route("/schedule/today", get(handlers::dashboard::today_schedule))
        .route("/queue/urgent", get(handlers::dashboard::urgent_queue))
        .route("/top/hospitals", get(handlers::dashboard::top_hospitals))
        .route("/schedule/range", get(handlers::dashboard::schedule_range))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo sob /api
    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(me_routes)
        .nest("/auth", auth_routes)
        .nest("/branches", branch_routes)
        .nest("/hospitals", hospital_routes)
        .nest("/dashboard", dashboard_routes);

    let app = Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
