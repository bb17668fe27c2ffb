// src/models/directory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// O destino de um transporte. Pertence à empresa (lista mestre
// compartilhada por todas as filiais), nunca a uma filial específica.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Forma reduzida usada nas respostas do dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRef {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

impl HospitalRef {
    // Placeholder para um hospital que não resolveu na hidratação
    // (ex.: remanejado para outra empresa). A contagem nunca some.
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            address: String::new(),
        }
    }
}

impl From<Hospital> for HospitalRef {
    fn from(h: Hospital) -> Self {
        Self {
            id: h.id,
            name: h.name,
            address: h.address,
        }
    }
}
