// src/db/hospital_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::directory::Hospital};

#[derive(Clone)]
pub struct HospitalRepository {
    pool: PgPool,
}

impl HospitalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Hospital>, AppError> {
        let hospitals = sqlx::query_as::<_, Hospital>(
            "SELECT * FROM hospitals WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(hospitals)
    }

    pub async fn count_by_company(&self, company_id: Uuid) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM hospitals WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    pub async fn find_by_id_and_company(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Hospital>, AppError> {
        let hospital =
            sqlx::query_as::<_, Hospital>("SELECT * FROM hospitals WHERE id = $1 AND company_id = $2")
                .bind(id)
                .bind(company_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(hospital)
    }

    // Hidratação do ranking: sempre restrita à empresa do chamador, como
    // defesa contra um hospital remanejado para outro tenant.
    pub async fn find_by_ids_and_company(
        &self,
        ids: &[Uuid],
        company_id: Uuid,
    ) -> Result<Vec<Hospital>, AppError> {
        let hospitals = sqlx::query_as::<_, Hospital>(
            "SELECT * FROM hospitals WHERE id = ANY($1) AND company_id = $2",
        )
        .bind(ids)
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(hospitals)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        name: &str,
        address: &str,
    ) -> Result<Hospital, AppError> {
        let hospital = sqlx::query_as::<_, Hospital>(
            r#"
            INSERT INTO hospitals (company_id, name, address)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(hospital)
    }

    // Atualização parcial: COALESCE mantém o valor atual quando o campo não veio.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
    ) -> Result<Hospital, AppError> {
        let hospital = sqlx::query_as::<_, Hospital>(
            r#"
            UPDATE hospitals
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(hospital)
    }

    // Quantos agendamentos da empresa ainda apontam para este hospital
    pub async fn count_shifts_referencing(
        &self,
        hospital_id: Uuid,
        company_id: Uuid,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM shifts s
            JOIN hospitals h ON h.id = s.hospital_id
            WHERE s.hospital_id = $1 AND h.company_id = $2
            "#,
        )
        .bind(hospital_id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM hospitals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
