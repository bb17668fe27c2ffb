// src/services/shift_service.rs

use uuid::Uuid;

use crate::{
    common::{access::assert_branch_access, error::AppError},
    db::{BranchRepository, HospitalRepository, PatientRepository, ShiftRepository},
    models::{
        auth::AuthUser,
        scheduling::{MeetingType, Priority, Shift},
    },
    services::dashboard_service::parse_instant,
};

pub struct NewShift<'a> {
    pub patient_id: Uuid,
    pub start_time_raw: &'a str,
    pub end_time_raw: &'a str,
    pub notes: Option<&'a str>,
    pub meeting_type: Option<MeetingType>,
    pub priority: Option<Priority>,
    pub hospital_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct ShiftService {
    branch_repo: BranchRepository,
    patient_repo: PatientRepository,
    hospital_repo: HospitalRepository,
    shift_repo: ShiftRepository,
}

impl ShiftService {
    pub fn new(
        branch_repo: BranchRepository,
        patient_repo: PatientRepository,
        hospital_repo: HospitalRepository,
        shift_repo: ShiftRepository,
    ) -> Self {
        Self {
            branch_repo,
            patient_repo,
            hospital_repo,
            shift_repo,
        }
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        branch_id: Uuid,
        new_shift: NewShift<'_>,
    ) -> Result<Shift, AppError> {
        // 1. Autorização de filial, antes de tocar em qualquer dado
        assert_branch_access(&self.branch_repo, user, branch_id).await?;

        // 2. Horários: instantes válidos, com fim depois do início
        let start_time = parse_instant(new_shift.start_time_raw).ok_or(AppError::InvalidShiftTimes)?;
        let end_time = parse_instant(new_shift.end_time_raw).ok_or(AppError::InvalidShiftTimes)?;

        if end_time <= start_time {
            return Err(AppError::InvalidShiftTimes);
        }

        // 3. O paciente precisa ser DESTA filial (impede agendamento cruzado)
        let patient_ok = self
            .patient_repo
            .exists_in_branch(new_shift.patient_id, branch_id)
            .await?;

        if !patient_ok {
            return Err(AppError::PatientNotInBranch);
        }

        // 4. Hospital, se veio, precisa ser da empresa (lista mestre compartilhada)
        if let Some(hospital_id) = new_shift.hospital_id {
            self.hospital_repo
                .find_by_id_and_company(hospital_id, user.company_id)
                .await?
                .ok_or(AppError::HospitalNotFound)?;
        }

        self.shift_repo
            .create(
                branch_id,
                new_shift.patient_id,
                new_shift.hospital_id,
                start_time,
                end_time,
                new_shift.notes,
                new_shift.meeting_type.unwrap_or(MeetingType::Physical),
                new_shift.priority.unwrap_or(Priority::Normal),
            )
            .await
    }
}
