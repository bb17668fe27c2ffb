// src/db/patient_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::scheduling::Patient};

#[derive(Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_branch(&self, branch_id: Uuid) -> Result<Vec<Patient>, AppError> {
        let patients = sqlx::query_as::<_, Patient>(
            "SELECT * FROM patients WHERE branch_id = $1 ORDER BY last_name ASC, first_name ASC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    // Contagem por conjunto de filiais (sem filtro de tempo)
    pub async fn count_by_branches(&self, branch_ids: &[Uuid]) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients WHERE branch_id = ANY($1)")
            .bind(branch_ids)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    // Checagem de pertencimento usada na criação de agendamentos
    // (impede agendar um paciente de outra filial).
    pub async fn exists_in_branch(&self, patient_id: Uuid, branch_id: Uuid) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM patients WHERE id = $1 AND branch_id = $2)",
        )
        .bind(patient_id)
        .bind(branch_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    pub async fn create(
        &self,
        branch_id: Uuid,
        first_name: &str,
        last_name: &str,
        gender: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Patient, AppError> {
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (branch_id, first_name, last_name, gender, date_of_birth)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(branch_id)
        .bind(first_name)
        .bind(last_name)
        .bind(gender)
        .bind(date_of_birth)
        .fetch_one(&self.pool)
        .await?;

        Ok(patient)
    }
}
