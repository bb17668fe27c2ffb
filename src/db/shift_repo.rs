// src/db/shift_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{HospitalShiftCount, PriorityCount, ScheduleRow, TypeCount},
        scheduling::{MeetingType, Priority, Shift},
    },
};

// Projeção compartilhada pelas visões de agenda: agendamento + filial
// {id, nome} + paciente completo + hospital completo (LEFT JOIN).
const SCHEDULE_SELECT: &str = r#"
SELECT
    s.id, s.branch_id, s.patient_id, s.hospital_id,
    s.start_time, s.end_time, s.notes, s.meeting_type, s.priority,
    b.name AS branch_name,
    p.first_name AS patient_first_name,
    p.last_name AS patient_last_name,
    p.gender AS patient_gender,
    p.date_of_birth AS patient_date_of_birth,
    p.created_at AS patient_created_at,
    p.updated_at AS patient_updated_at,
    h.company_id AS hospital_company_id,
    h.name AS hospital_name,
    h.address AS hospital_address,
    h.created_at AS hospital_created_at,
    h.updated_at AS hospital_updated_at
FROM shifts s
JOIN branches b ON b.id = s.branch_id
JOIN patients p ON p.id = s.patient_id
LEFT JOIN hospitals h ON h.id = s.hospital_id
"#;

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // 1. Contagens (o motor de métricas consome estas quatro)
    // ---

    // Total de agendamentos, sem filtro de tempo
    pub async fn count_for_branches(&self, branch_ids: &[Uuid]) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shifts WHERE branch_id = ANY($1)")
            .bind(branch_ids)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    // Agendamentos iniciando no intervalo semiaberto [from, to)
    pub async fn count_starting_between(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM shifts
            WHERE branch_id = ANY($1)
              AND start_time >= $2
              AND start_time < $3
            "#,
        )
        .bind(branch_ids)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn count_urgent_for_branches(&self, branch_ids: &[Uuid]) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shifts WHERE branch_id = ANY($1) AND priority = $2",
        )
        .bind(branch_ids)
        .bind(Priority::Urgent)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn count_urgent_starting_between(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM shifts
            WHERE branch_id = ANY($1)
              AND priority = $2
              AND start_time >= $3
              AND start_time < $4
            "#,
        )
        .bind(branch_ids)
        .bind(Priority::Urgent)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // ---
    // 2. Visões de agenda (linhas com junções)
    // ---

    // Agendamentos iniciando em [from, to). A ordenação de despacho
    // (prioridade antes do horário) é aplicada pelo serviço.
    pub async fn scheduled_between(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ScheduleRow>, AppError> {
        let sql = format!(
            r#"{SCHEDULE_SELECT}
            WHERE s.branch_id = ANY($1)
              AND s.start_time >= $2
              AND s.start_time < $3
            ORDER BY s.start_time ASC
            "#
        );

        let rows = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(branch_ids)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // Apenas os URGENT iniciando em [from, to), já em ordem de horário
    pub async fn urgent_between(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ScheduleRow>, AppError> {
        let sql = format!(
            r#"{SCHEDULE_SELECT}
            WHERE s.branch_id = ANY($1)
              AND s.priority = $2
              AND s.start_time >= $3
              AND s.start_time < $4
            ORDER BY s.start_time ASC
            "#
        );

        let rows = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(branch_ids)
            .bind(Priority::Urgent)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // ---
    // 3. Agrupamentos
    // ---

    pub async fn group_counts_by_type(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TypeCount>, AppError> {
        let counts = sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT s.meeting_type, COUNT(*) AS count
            FROM shifts s
            WHERE s.branch_id = ANY($1)
              AND s.start_time >= $2
              AND s.start_time < $3
            GROUP BY s.meeting_type
            ORDER BY count DESC, s.meeting_type ASC
            "#,
        )
        .bind(branch_ids)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn group_counts_by_priority(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PriorityCount>, AppError> {
        let counts = sqlx::query_as::<_, PriorityCount>(
            r#"
            SELECT s.priority, COUNT(*) AS count
            FROM shifts s
            WHERE s.branch_id = ANY($1)
              AND s.start_time >= $2
              AND s.start_time < $3
            GROUP BY s.priority
            ORDER BY count DESC, s.priority ASC
            "#,
        )
        .bind(branch_ids)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    // Ranking: agendamentos com destino em [from, to), agrupados por
    // hospital, mais frequentes primeiro. Só os ids; a hidratação (restrita
    // à empresa do chamador) fica com o serviço.
    pub async fn top_hospital_counts(
        &self,
        branch_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<HospitalShiftCount>, AppError> {
        let counts = sqlx::query_as::<_, HospitalShiftCount>(
            r#"
            SELECT s.hospital_id, COUNT(*) AS count
            FROM shifts s
            WHERE s.branch_id = ANY($1)
              AND s.hospital_id IS NOT NULL
              AND s.start_time >= $2
              AND s.start_time < $3
            GROUP BY s.hospital_id
            ORDER BY count DESC, s.hospital_id ASC
            LIMIT $4
            "#,
        )
        .bind(branch_ids)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    // ---
    // 4. Escrita
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        branch_id: Uuid,
        patient_id: Uuid,
        hospital_id: Option<Uuid>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: Option<&str>,
        meeting_type: MeetingType,
        priority: Priority,
    ) -> Result<Shift, AppError> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            INSERT INTO shifts (branch_id, patient_id, hospital_id, start_time, end_time, notes, meeting_type, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(branch_id)
        .bind(patient_id)
        .bind(hospital_id)
        .bind(start_time)
        .bind(end_time)
        .bind(notes)
        .bind(meeting_type)
        .bind(priority)
        .fetch_one(&self.pool)
        .await?;

        Ok(shift)
    }
}
