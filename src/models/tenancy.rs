// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Company (A raiz do tenant)
// ---
// A transportadora em si. Nenhum dado cruza a fronteira de uma empresa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Branch (A Filial)
// ---
// A unidade operacional: pacientes e agendamentos pertencem a uma filial.
// A busca é sempre pelo par (id, company_id) para reforçar a tenancy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. UserBranch (A "Ponte" Usuário-Filial)
// ---
// Concede a um usuário STAFF acesso explícito a uma filial.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBranch {
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub created_at: DateTime<Utc>,
}
