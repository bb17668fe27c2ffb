// src/services/branch_service.rs

use crate::{
    common::{access::resolve_branch_scope, error::AppError},
    db::BranchRepository,
    models::{
        auth::{AuthUser, Role},
        tenancy::Branch,
    },
};

#[derive(Clone)]
pub struct BranchService {
    branch_repo: BranchRepository,
}

impl BranchService {
    pub fn new(branch_repo: BranchRepository) -> Self {
        Self { branch_repo }
    }

    // Só as filiais dentro do escopo do usuário, ordenadas por nome.
    pub async fn list_for_user(&self, user: &AuthUser) -> Result<Vec<Branch>, AppError> {
        let scope = resolve_branch_scope(&self.branch_repo, user).await?;

        if scope.branch_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.branch_repo.find_by_ids(&scope.branch_ids).await
    }

    pub async fn create(&self, user: &AuthUser, name: &str, address: &str) -> Result<Branch, AppError> {
        // Criar filial é estrutural: exclusivo do administrador da empresa.
        if user.role != Role::SuperAdmin {
            return Err(AppError::AdminOnly);
        }

        let name = name.trim();
        let address = address.trim();

        if name.is_empty() {
            return Err(AppError::EmptyField("name"));
        }
        if address.is_empty() {
            return Err(AppError::EmptyField("address"));
        }

        self.branch_repo.create(user.company_id, name, address).await
    }
}
