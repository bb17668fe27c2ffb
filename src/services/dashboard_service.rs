// src/services/dashboard_service.rs

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    common::{
        access::resolve_branch_scope,
        error::{AppError, RangeError},
    },
    db::{BranchRepository, HospitalRepository, PatientRepository, ShiftRepository},
    models::{
        auth::AuthUser,
        dashboard::{
            BranchDrilldown, BranchMetrics, BranchOverviewEntry, CompanyOverview, DrilldownBreakdown,
            HospitalShiftCount, ScheduleEntry, ScheduleRange, ScheduleWindows, ScopeInfo,
            TopHospitalEntry,
        },
        directory::{Hospital, HospitalRef},
    },
};

// O ranking de hospitais corta nos 10 mais frequentes.
const TOP_HOSPITALS_LIMIT: i64 = 10;

// Tamanho máximo do intervalo da consulta por período, medido como duração
// bruta (31 dias de 24h), não como dias de calendário. Os insumos são
// instantes UTC, então a conta é imune a horário de verão.
const MAX_RANGE_DAYS: i64 = 31;

// ---
// Relógio injetável
// ---
// Toda janela parte do "agora"; injetar o relógio (em vez de ler o relógio
// global direto) permite fixar instantes determinísticos nos testes.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

// ---
// Validador de intervalo
// ---

// Aceita um instante RFC 3339 ou uma data pura (YYYY-MM-DD, lida como
// meia-noite UTC), espelhando o parsing ISO leniente da API.
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Valida e normaliza o intervalo [from, to) da consulta por período.
///
/// Falha na PRIMEIRA regra violada, nesta ordem: parse do from, parse do
/// to, ordem das pontas (pontas iguais são rejeitadas, não tratadas como
/// intervalo vazio) e teto de 31 dias.
pub fn validate_range(from_raw: &str, to_raw: &str) -> Result<ScheduleRange, RangeError> {
    let from = parse_instant(from_raw).ok_or(RangeError::InvalidFrom)?;
    let to = parse_instant(to_raw).ok_or(RangeError::InvalidTo)?;

    if to <= from {
        return Err(RangeError::InvalidRange);
    }

    if to - from > Duration::days(MAX_RANGE_DAYS) {
        return Err(RangeError::RangeTooLarge);
    }

    Ok(ScheduleRange { from, to })
}

// ---
// Ordenação do quadro de despacho
// ---
// URGENT antes de NORMAL; dentro da mesma prioridade, o horário mais cedo
// primeiro.
pub(crate) fn dispatch_order(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.start_time.cmp(&b.start_time))
}

// Junta as contagens agrupadas com os hospitais hidratados, preservando a
// ordem do ranking. Um id que não resolveu na hidratação (ex.: hospital
// remanejado de empresa) vira um placeholder; a contagem nunca some.
pub(crate) fn merge_top_hospitals(
    counts: Vec<HospitalShiftCount>,
    hospitals: Vec<Hospital>,
) -> Vec<TopHospitalEntry> {
    let mut by_id: HashMap<Uuid, HospitalRef> = hospitals
        .into_iter()
        .map(|h| (h.id, HospitalRef::from(h)))
        .collect();

    counts
        .into_iter()
        .map(|entry| TopHospitalEntry {
            hospital: by_id
                .remove(&entry.hospital_id)
                .unwrap_or_else(|| HospitalRef::unknown(entry.hospital_id)),
            shift_count: entry.count,
        })
        .collect()
}

// ---
// O serviço
// ---

#[derive(Clone)]
pub struct DashboardService {
    branch_repo: BranchRepository,
    hospital_repo: HospitalRepository,
    patient_repo: PatientRepository,
    shift_repo: ShiftRepository,
    clock: Clock,
}

impl DashboardService {
    pub fn new(
        branch_repo: BranchRepository,
        hospital_repo: HospitalRepository,
        patient_repo: PatientRepository,
        shift_repo: ShiftRepository,
        clock: Clock,
    ) -> Self {
        Self {
            branch_repo,
            hospital_repo,
            patient_repo,
            shift_repo,
            clock,
        }
    }

    // Janelas recalculadas do zero a cada chamada; nada de cache.
    fn windows(&self) -> ScheduleWindows {
        ScheduleWindows::at((self.clock)())
    }

    // Resolve o escopo e aplica o filtro opcional de filial.
    // Uma filial fora do escopo responde "não encontrada" (nunca 403),
    // para não confirmar a existência de filiais alheias.
    async fn scoped_branch_ids(
        &self,
        user: &AuthUser,
        branch_filter: Option<Uuid>,
    ) -> Result<Vec<Uuid>, AppError> {
        let scope = resolve_branch_scope(&self.branch_repo, user).await?;

        match branch_filter {
            Some(branch_id) if scope.contains(branch_id) => Ok(vec![branch_id]),
            Some(_) => Err(AppError::BranchNotFound),
            None => Ok(scope.branch_ids),
        }
    }

    /// O pacote de métricas para um conjunto arbitrário de filiais.
    ///
    /// As seis contagens são leituras independentes (sem transação): um
    /// snapshot por contagem, e escritas intercaladas podem desalinhar
    /// levemente contagens irmãs do mesmo pacote. Tolerância aceita.
    pub async fn metrics_for_branches(&self, branch_ids: &[Uuid]) -> Result<BranchMetrics, AppError> {
        let windows = self.windows();

        // Conjunto vazio: nada a consultar, contagens zeradas, janela válida.
        if branch_ids.is_empty() {
            return Ok(BranchMetrics::empty(windows));
        }

        let patients_total = self.patient_repo.count_by_branches(branch_ids).await?;
        let shifts_total = self.shift_repo.count_for_branches(branch_ids).await?;
        let shifts_today = self
            .shift_repo
            .count_starting_between(branch_ids, windows.today_start, windows.tomorrow_start)
            .await?;

        // A janela de 7 dias começa HOJE: shiftsNext7Days ⊇ shiftsToday.
        let shifts_next7_days = self
            .shift_repo
            .count_starting_between(branch_ids, windows.today_start, windows.next7_end)
            .await?;

        let urgent_total = self.shift_repo.count_urgent_for_branches(branch_ids).await?;
        let urgent_today = self
            .shift_repo
            .count_urgent_starting_between(branch_ids, windows.today_start, windows.tomorrow_start)
            .await?;

        Ok(BranchMetrics {
            window: windows.into(),
            patients_total,
            shifts_total,
            shifts_today,
            shifts_next7_days,
            urgent_total,
            urgent_today,
        })
    }

    // 1. Visão geral da empresa (os cards do topo)
    pub async fn company_overview(&self, user: &AuthUser) -> Result<CompanyOverview, AppError> {
        let scope = resolve_branch_scope(&self.branch_repo, user).await?;

        let hospitals_total = self.hospital_repo.count_by_company(user.company_id).await?;
        let metrics = self.metrics_for_branches(&scope.branch_ids).await?;

        Ok(CompanyOverview {
            scope: ScopeInfo {
                company_id: user.company_id,
                branch_count: scope.branch_count(),
                is_all_branches: scope.is_all_branches,
            },
            hospitals_total,
            metrics,
        })
    }

    // 2. Visão por filial: cada filial do escopo com métricas próprias,
    // calculadas sobre o conjunto unitário, nunca pré-agregadas.
    // Filiais fora do escopo ficam AUSENTES da lista (não zeradas).
    pub async fn branches_overview(&self, user: &AuthUser) -> Result<Vec<BranchOverviewEntry>, AppError> {
        let scope = resolve_branch_scope(&self.branch_repo, user).await?;

        if scope.branch_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Já vem ordenado por nome; o resultado segue essa ordem.
        let branches = self.branch_repo.find_by_ids(&scope.branch_ids).await?;

        let mut entries = Vec::with_capacity(branches.len());
        for branch in branches {
            let metrics = self.metrics_for_branches(&[branch.id]).await?;
            entries.push(BranchOverviewEntry { branch, metrics });
        }

        Ok(entries)
    }

    // 3. Detalhe de uma filial, com a decomposição dos próximos 7 dias
    pub async fn branch_drilldown(
        &self,
        user: &AuthUser,
        branch_id: Uuid,
    ) -> Result<BranchDrilldown, AppError> {
        let scope = resolve_branch_scope(&self.branch_repo, user).await?;

        // Checagem de escopo ANTES de qualquer consulta de métrica:
        // nenhum agregado parcial para escopos não autorizados.
        if !scope.contains(branch_id) {
            return Err(AppError::BranchNotFound);
        }

        let branch = self
            .branch_repo
            .find_by_id_and_company(branch_id, user.company_id)
            .await?
            .ok_or(AppError::BranchNotFound)?;

        let windows = self.windows();
        let branch_set = [branch_id];

        let metrics = self.metrics_for_branches(&branch_set).await?;
        let by_type = self
            .shift_repo
            .group_counts_by_type(&branch_set, windows.today_start, windows.next7_end)
            .await?;
        let by_priority = self
            .shift_repo
            .group_counts_by_priority(&branch_set, windows.today_start, windows.next7_end)
            .await?;

        Ok(BranchDrilldown {
            branch,
            metrics,
            breakdown: DrilldownBreakdown { by_type, by_priority },
        })
    }

    // 4. Agenda de hoje, em ordem de despacho (URGENT primeiro)
    pub async fn today_schedule(
        &self,
        user: &AuthUser,
        branch_filter: Option<Uuid>,
    ) -> Result<Vec<ScheduleEntry>, AppError> {
        let branch_ids = self.scoped_branch_ids(user, branch_filter).await?;
        if branch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let windows = self.windows();
        let rows = self
            .shift_repo
            .scheduled_between(&branch_ids, windows.today_start, windows.tomorrow_start)
            .await?;

        let mut entries: Vec<ScheduleEntry> = rows.into_iter().map(Into::into).collect();
        entries.sort_by(dispatch_order);

        Ok(entries)
    }

    // 5. Fila de urgências dos próximos 7 dias (todas URGENT; só o horário ordena)
    pub async fn urgent_queue(
        &self,
        user: &AuthUser,
        branch_filter: Option<Uuid>,
    ) -> Result<Vec<ScheduleEntry>, AppError> {
        let branch_ids = self.scoped_branch_ids(user, branch_filter).await?;
        if branch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let windows = self.windows();
        let rows = self
            .shift_repo
            .urgent_between(&branch_ids, windows.today_start, windows.next7_end)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // 6. Ranking dos hospitais mais usados nos próximos 30 dias
    pub async fn top_hospitals(
        &self,
        user: &AuthUser,
        branch_filter: Option<Uuid>,
    ) -> Result<Vec<TopHospitalEntry>, AppError> {
        let branch_ids = self.scoped_branch_ids(user, branch_filter).await?;
        if branch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let windows = self.windows();
        let counts = self
            .shift_repo
            .top_hospital_counts(
                &branch_ids,
                windows.today_start,
                windows.next30_end,
                TOP_HOSPITALS_LIMIT,
            )
            .await?;

        if counts.is_empty() {
            return Ok(Vec::new());
        }

        // Uma única consulta de hidratação, restrita à empresa do chamador.
        let hospital_ids: Vec<Uuid> = counts.iter().map(|c| c.hospital_id).collect();
        let hospitals = self
            .hospital_repo
            .find_by_ids_and_company(&hospital_ids, user.company_id)
            .await?;

        Ok(merge_top_hospitals(counts, hospitals))
    }

    // 7. Agenda por período arbitrário [from, to), mesmo shape e ordem da agenda de hoje
    pub async fn schedule_range(
        &self,
        user: &AuthUser,
        from_raw: &str,
        to_raw: &str,
        branch_filter: Option<Uuid>,
    ) -> Result<Vec<ScheduleEntry>, AppError> {
        let range = validate_range(from_raw, to_raw)?;

        let branch_ids = self.scoped_branch_ids(user, branch_filter).await?;
        if branch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .shift_repo
            .scheduled_between(&branch_ids, range.from, range.to)
            .await?;

        let mut entries: Vec<ScheduleEntry> = rows.into_iter().map(Into::into).collect();
        entries.sort_by(dispatch_order);

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::BranchRef;
    use crate::models::scheduling::{MeetingType, Patient, Priority};
    use chrono::TimeZone;

    // ---
    // validate_range
    // ---

    #[test]
    fn intervalo_valido_normaliza_para_utc() {
        let range = validate_range("2024-01-10T00:00:00Z", "2024-01-20T12:30:00Z").unwrap();
        assert_eq!(range.from, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(range.to, Utc.with_ymd_and_hms(2024, 1, 20, 12, 30, 0).unwrap());
    }

    #[test]
    fn aceita_data_pura_como_meia_noite_utc() {
        let range = validate_range("2024-01-10", "2024-01-15").unwrap();
        assert_eq!(range.from, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(range.to, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn from_invalido_tem_precedencia_sobre_to_invalido() {
        // As duas pontas são inválidas; só a primeira regra violada responde.
        assert_eq!(
            validate_range("not-a-date", "not-a-date"),
            Err(RangeError::InvalidFrom)
        );
    }

    #[test]
    fn to_invalido_depois_de_from_valido() {
        assert_eq!(
            validate_range("2024-01-10T00:00:00Z", "not-a-date"),
            Err(RangeError::InvalidTo)
        );
    }

    #[test]
    fn pontas_iguais_sao_rejeitadas() {
        assert_eq!(
            validate_range("2024-01-10T00:00:00Z", "2024-01-10T00:00:00Z"),
            Err(RangeError::InvalidRange)
        );
    }

    #[test]
    fn intervalo_invertido_e_rejeitado() {
        assert_eq!(
            validate_range("2024-01-20T00:00:00Z", "2024-01-10T00:00:00Z"),
            Err(RangeError::InvalidRange)
        );
    }

    #[test]
    fn quarenta_e_cinco_dias_estouram_o_teto() {
        assert_eq!(
            validate_range("2024-01-01T00:00:00Z", "2024-02-15T00:00:00Z"),
            Err(RangeError::RangeTooLarge)
        );
    }

    #[test]
    fn exatamente_31_dias_passa() {
        // O teto é "maior que 31 dias"; 31 cravados ainda é aceito.
        assert!(validate_range("2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z").is_ok());
    }

    // ---
    // dispatch_order
    // ---

    fn entry(priority: Priority, start: chrono::DateTime<Utc>) -> ScheduleEntry {
        let branch_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        ScheduleEntry {
            id: Uuid::new_v4(),
            branch_id,
            patient_id,
            hospital_id: None,
            start_time: start,
            end_time: start + Duration::hours(1),
            notes: None,
            meeting_type: MeetingType::Physical,
            priority,
            branch: BranchRef {
                id: branch_id,
                name: "Central".to_string(),
            },
            patient: Patient {
                id: patient_id,
                branch_id,
                first_name: "Ana".to_string(),
                last_name: "Souza".to_string(),
                gender: "F".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 20).unwrap(),
                created_at: created,
                updated_at: created,
            },
            hospital: None,
        }
    }

    #[test]
    fn urgente_vem_antes_mesmo_comecando_mais_tarde() {
        let urgent = entry(
            Priority::Urgent,
            Utc.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap(),
        );
        let normal = entry(
            Priority::Normal,
            Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
        );

        let mut board = vec![normal, urgent];
        board.sort_by(dispatch_order);

        assert_eq!(board[0].priority, Priority::Urgent);
        assert_eq!(board[1].priority, Priority::Normal);
    }

    #[test]
    fn mesma_prioridade_ordena_pelo_horario() {
        let late = entry(
            Priority::Normal,
            Utc.with_ymd_and_hms(2024, 3, 15, 16, 0, 0).unwrap(),
        );
        let early = entry(
            Priority::Normal,
            Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
        );

        let mut board = vec![late.clone(), early.clone()];
        board.sort_by(dispatch_order);

        assert_eq!(board[0].id, early.id);
        assert_eq!(board[1].id, late.id);
    }

    // ---
    // merge_top_hospitals
    // ---

    fn hospital(id: Uuid, name: &str) -> Hospital {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Hospital {
            id,
            company_id: Uuid::new_v4(),
            name: name.to_string(),
            address: "77 W Monroe St".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn id_sem_hidratacao_vira_placeholder_e_mantem_a_contagem() {
        let known = Uuid::new_v4();
        let orphan = Uuid::new_v4();

        let counts = vec![
            HospitalShiftCount {
                hospital_id: known,
                count: 7,
            },
            HospitalShiftCount {
                hospital_id: orphan,
                count: 3,
            },
        ];
        let ranking = merge_top_hospitals(counts, vec![hospital(known, "Lakeside Clinic")]);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].hospital.name, "Lakeside Clinic");
        assert_eq!(ranking[0].shift_count, 7);

        // O hospital que sumiu da empresa ainda aparece, como "Unknown".
        assert_eq!(ranking[1].hospital.id, orphan);
        assert_eq!(ranking[1].hospital.name, "Unknown");
        assert_eq!(ranking[1].hospital.address, "");
        assert_eq!(ranking[1].shift_count, 3);
    }

    #[test]
    fn ranking_preserva_a_ordem_das_contagens() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let counts = vec![
            HospitalShiftCount { hospital_id: a, count: 12 },
            HospitalShiftCount { hospital_id: b, count: 5 },
        ];
        // A hidratação chega em ordem qualquer; o ranking não muda.
        let ranking = merge_top_hospitals(counts, vec![hospital(b, "Southside"), hospital(a, "Downtown")]);

        assert_eq!(ranking[0].hospital.name, "Downtown");
        assert_eq!(ranking[1].hospital.name, "Southside");
    }
}
