// src/services/hospital_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HospitalRepository,
    models::{auth::AuthUser, directory::Hospital},
};

// O diretório de hospitais é da empresa inteira (qualquer usuário
// autenticado da empresa enxerga e mantém a lista mestre).
#[derive(Clone)]
pub struct HospitalService {
    hospital_repo: HospitalRepository,
}

impl HospitalService {
    pub fn new(hospital_repo: HospitalRepository) -> Self {
        Self { hospital_repo }
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<Hospital>, AppError> {
        self.hospital_repo.list_by_company(user.company_id).await
    }

    pub async fn create(&self, user: &AuthUser, name: &str, address: &str) -> Result<Hospital, AppError> {
        let name = name.trim();
        let address = address.trim();

        if name.is_empty() {
            return Err(AppError::EmptyField("name"));
        }
        if address.is_empty() {
            return Err(AppError::EmptyField("address"));
        }

        self.hospital_repo.create(user.company_id, name, address).await
    }

    // Atualização parcial: campo ausente mantém o valor; campo presente
    // mas vazio (após trim) é rejeitado.
    pub async fn update(
        &self,
        user: &AuthUser,
        hospital_id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
    ) -> Result<Hospital, AppError> {
        // Existência sempre checada pelo par (id, empresa).
        self.hospital_repo
            .find_by_id_and_company(hospital_id, user.company_id)
            .await?
            .ok_or(AppError::HospitalNotFound)?;

        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(AppError::EmptyField("name"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let address = match address {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(AppError::EmptyField("address"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        self.hospital_repo
            .update(hospital_id, name.as_deref(), address.as_deref())
            .await
    }

    pub async fn remove(&self, user: &AuthUser, hospital_id: Uuid) -> Result<(), AppError> {
        self.hospital_repo
            .find_by_id_and_company(hospital_id, user.company_id)
            .await?
            .ok_or(AppError::HospitalNotFound)?;

        // Nunca apaga um destino ainda referenciado por agendamentos.
        let shift_count = self
            .hospital_repo
            .count_shifts_referencing(hospital_id, user.company_id)
            .await?;

        if shift_count > 0 {
            return Err(AppError::HospitalInUse(shift_count));
        }

        self.hospital_repo.delete(hospital_id).await
    }
}
