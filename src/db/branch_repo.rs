// src/db/branch_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::tenancy::Branch};

#[derive(Clone)]
pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Todas as filiais de uma empresa (apenas os ids, para montar o escopo)
    pub async fn ids_for_company(&self, company_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM branches WHERE company_id = $1")
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    // Busca pelo par (id, empresa): a verificação de tenancy mais importante.
    pub async fn find_by_id_and_company(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Branch>, AppError> {
        let branch =
            sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1 AND company_id = $2")
                .bind(id)
                .bind(company_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(branch)
    }

    // Registros completos de um conjunto de filiais, ordenados por nome
    pub async fn find_by_ids(&self, branch_ids: &[Uuid]) -> Result<Vec<Branch>, AppError> {
        let branches =
            sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = ANY($1) ORDER BY name ASC")
                .bind(branch_ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(branches)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        name: &str,
        address: &str,
    ) -> Result<Branch, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (company_id, name, address)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(branch)
    }
}
