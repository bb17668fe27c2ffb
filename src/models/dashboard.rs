// src/models/dashboard.rs

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    directory::{Hospital, HospitalRef},
    scheduling::{MeetingType, Patient, Priority},
    tenancy::Branch,
};

// ---
// 1. Janelas de tempo
// ---
// Todas as janelas são intervalos semiabertos [início, fim) em UTC,
// calculadas a partir do "agora" injetado no serviço. O dia de hoje vai da
// meia-noite UTC até a meia-noite seguinte; a janela de 7 dias INCLUI hoje.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindows {
    pub today_start: DateTime<Utc>,
    pub tomorrow_start: DateTime<Utc>,
    pub next7_end: DateTime<Utc>,
    pub next30_end: DateTime<Utc>,
}

impl ScheduleWindows {
    pub fn at(now: DateTime<Utc>) -> Self {
        // Trunca para a meia-noite UTC preservando ano/mês/dia.
        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            today_start,
            tomorrow_start: today_start + Duration::days(1),
            next7_end: today_start + Duration::days(7),
            next30_end: today_start + Duration::days(30),
        }
    }
}

// As fronteiras da janela são ecoadas como instantes ISO-8601 para que o
// chamador consiga reproduzir exatamente a janela usada nas contagens.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWindowDto {
    pub today_start_utc: String,
    pub tomorrow_start_utc: String,
    pub next7_days_end_utc: String,
}

impl From<ScheduleWindows> for ScheduleWindowDto {
    fn from(w: ScheduleWindows) -> Self {
        Self {
            today_start_utc: w.today_start.to_rfc3339_opts(SecondsFormat::Millis, true),
            tomorrow_start_utc: w.tomorrow_start.to_rfc3339_opts(SecondsFormat::Millis, true),
            next7_days_end_utc: w.next7_end.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

// ---
// 2. Pacote de métricas por conjunto de filiais
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchMetrics {
    pub window: ScheduleWindowDto,
    pub patients_total: i64,
    pub shifts_total: i64,
    pub shifts_today: i64,
    pub shifts_next7_days: i64,
    pub urgent_total: i64,
    pub urgent_today: i64,
}

impl BranchMetrics {
    // Conjunto vazio de filiais: contagens zeradas, janela ainda válida.
    pub fn empty(windows: ScheduleWindows) -> Self {
        Self {
            window: windows.into(),
            patients_total: 0,
            shifts_total: 0,
            shifts_today: 0,
            shifts_next7_days: 0,
            urgent_total: 0,
            urgent_today: 0,
        }
    }
}

// ---
// 3. Visões agregadas
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScopeInfo {
    pub company_id: Uuid,
    pub branch_count: usize,
    pub is_all_branches: bool,
}

// Visão geral da empresa (os cards do topo do painel)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverview {
    pub scope: ScopeInfo,
    pub hospitals_total: i64,
    #[serde(flatten)]
    pub metrics: BranchMetrics,
}

// Uma linha da visão por filial: cada filial com suas próprias métricas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchOverviewEntry {
    pub branch: Branch,
    pub metrics: BranchMetrics,
}

// Contagem agrupada por modalidade (janela [hoje, +7d))
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    pub count: i64,
}

// Contagem agrupada por prioridade (janela [hoje, +7d))
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrilldownBreakdown {
    pub by_type: Vec<TypeCount>,
    pub by_priority: Vec<PriorityCount>,
}

// Detalhe de uma única filial
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchDrilldown {
    pub branch: Branch,
    #[serde(flatten)]
    pub metrics: BranchMetrics,
    pub breakdown: DrilldownBreakdown,
}

// ---
// 4. Linhas de agenda (agendamento + junções)
// ---
// Linha "achatada" como vem do SQL; o shape aninhado é montado no From.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleRow {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub patient_id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub meeting_type: MeetingType,
    pub priority: Priority,

    pub branch_name: String,

    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_gender: String,
    pub patient_date_of_birth: NaiveDate,
    pub patient_created_at: DateTime<Utc>,
    pub patient_updated_at: DateTime<Utc>,

    pub hospital_company_id: Option<Uuid>,
    pub hospital_name: Option<String>,
    pub hospital_address: Option<String>,
    pub hospital_created_at: Option<DateTime<Utc>>,
    pub hospital_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchRef {
    pub id: Uuid,
    pub name: String,
}

// Item da agenda como o quadro de despacho consome: agendamento com a
// filial {id, nome}, o paciente completo e o hospital completo (ou null).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub patient_id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    pub priority: Priority,
    pub branch: BranchRef,
    pub patient: Patient,
    pub hospital: Option<Hospital>,
}

impl From<ScheduleRow> for ScheduleEntry {
    fn from(row: ScheduleRow) -> Self {
        // O hospital só existe se a junção (LEFT JOIN) trouxe as colunas.
        let hospital = match (
            row.hospital_id,
            row.hospital_company_id,
            row.hospital_name,
            row.hospital_address,
            row.hospital_created_at,
            row.hospital_updated_at,
        ) {
            (Some(id), Some(company_id), Some(name), Some(address), Some(created_at), Some(updated_at)) => {
                Some(Hospital {
                    id,
                    company_id,
                    name,
                    address,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        Self {
            id: row.id,
            branch_id: row.branch_id,
            patient_id: row.patient_id,
            hospital_id: row.hospital_id,
            start_time: row.start_time,
            end_time: row.end_time,
            notes: row.notes,
            meeting_type: row.meeting_type,
            priority: row.priority,
            branch: BranchRef {
                id: row.branch_id,
                name: row.branch_name,
            },
            patient: Patient {
                id: row.patient_id,
                branch_id: row.branch_id,
                first_name: row.patient_first_name,
                last_name: row.patient_last_name,
                gender: row.patient_gender,
                date_of_birth: row.patient_date_of_birth,
                created_at: row.patient_created_at,
                updated_at: row.patient_updated_at,
            },
            hospital,
        }
    }
}

// ---
// 5. Ranking de hospitais
// ---
// Contagem agrupada vinda do SQL (apenas ids); a hidratação acontece depois.
#[derive(Debug, Clone, FromRow)]
pub struct HospitalShiftCount {
    pub hospital_id: Uuid,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopHospitalEntry {
    pub hospital: HospitalRef,
    pub shift_count: i64,
}

// Intervalo [from, to) já validado para a consulta de agenda por período.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

// Parâmetros de query aceitos pelas rotas do dashboard
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub branch_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn janelas_truncam_para_meia_noite_utc() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 14, 37, 25).unwrap();
        let w = ScheduleWindows::at(now);

        assert_eq!(w.today_start, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(w.tomorrow_start, Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap());
        assert_eq!(w.next7_end, Utc.with_ymd_and_hms(2024, 3, 22, 0, 0, 0).unwrap());
        assert_eq!(w.next30_end, Utc.with_ymd_and_hms(2024, 4, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn janela_de_7_dias_inclui_hoje() {
        let w = ScheduleWindows::at(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());

        // [hoje, +7d) = [hoje, amanhã) + [amanhã, +7d): a semana começa hoje.
        assert_eq!(w.tomorrow_start - w.today_start, Duration::days(1));
        assert_eq!(w.next7_end - w.today_start, Duration::days(7));
        assert!(w.today_start < w.tomorrow_start && w.tomorrow_start < w.next7_end);
    }

    #[test]
    fn janela_ecoa_instantes_iso8601() {
        let w = ScheduleWindows::at(Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap());
        let dto = ScheduleWindowDto::from(w);

        assert_eq!(dto.today_start_utc, "2024-03-15T00:00:00.000Z");
        assert_eq!(dto.tomorrow_start_utc, "2024-03-16T00:00:00.000Z");
        assert_eq!(dto.next7_days_end_utc, "2024-03-22T00:00:00.000Z");
    }

    #[test]
    fn metricas_vazias_mantem_janela_valida() {
        let w = ScheduleWindows::at(Utc.with_ymd_and_hms(2024, 6, 10, 3, 0, 0).unwrap());
        let m = BranchMetrics::empty(w);

        assert_eq!(m.patients_total, 0);
        assert_eq!(m.shifts_total, 0);
        assert_eq!(m.shifts_today, 0);
        assert_eq!(m.shifts_next7_days, 0);
        assert_eq!(m.urgent_total, 0);
        assert_eq!(m.urgent_today, 0);
        assert_eq!(m.window.today_start_utc, "2024-06-10T00:00:00.000Z");
        assert_eq!(m.window.next7_days_end_utc, "2024-06-17T00:00:00.000Z");
    }
}
