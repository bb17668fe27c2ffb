// src/services/patient_service.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::{access::assert_branch_access, error::AppError},
    db::{BranchRepository, PatientRepository},
    models::{auth::AuthUser, scheduling::Patient},
};

#[derive(Clone)]
pub struct PatientService {
    branch_repo: BranchRepository,
    patient_repo: PatientRepository,
}

impl PatientService {
    pub fn new(branch_repo: BranchRepository, patient_repo: PatientRepository) -> Self {
        Self {
            branch_repo,
            patient_repo,
        }
    }

    pub async fn list(&self, user: &AuthUser, branch_id: Uuid) -> Result<Vec<Patient>, AppError> {
        // O guard roda antes de qualquer leitura de dados.
        assert_branch_access(&self.branch_repo, user, branch_id).await?;

        self.patient_repo.list_by_branch(branch_id).await
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        branch_id: Uuid,
        first_name: &str,
        last_name: &str,
        gender: &str,
        date_of_birth_raw: &str,
    ) -> Result<Patient, AppError> {
        assert_branch_access(&self.branch_repo, user, branch_id).await?;

        let first_name = first_name.trim();
        let last_name = last_name.trim();
        let gender = gender.trim();

        if first_name.is_empty() {
            return Err(AppError::EmptyField("firstName"));
        }
        if last_name.is_empty() {
            return Err(AppError::EmptyField("lastName"));
        }
        if gender.is_empty() {
            return Err(AppError::EmptyField("gender"));
        }

        let date_of_birth = NaiveDate::parse_from_str(date_of_birth_raw.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDateOfBirth)?;

        self.patient_repo
            .create(branch_id, first_name, last_name, gender, date_of_birth)
            .await
    }
}
