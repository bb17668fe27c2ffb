// src/common/access.rs

use uuid::Uuid;

use crate::{common::error::AppError, db::BranchRepository, models::auth::{AuthUser, Role}};

// ---
// Regras de acesso a filiais, compartilhadas por todo o backend
// ---
// O resolvedor de escopo (leituras agregadas) e o guard de filial
// (escritas/leituras pontuais) consomem o MESMO predicado de acesso
// total, para as duas regras nunca divergirem.

/// Acesso à empresa inteira: papel SUPER_ADMIN ou a flag de "coringa"
/// (`can_access_all_branches`), que é independente do papel.
pub fn has_company_wide_access(user: &AuthUser) -> bool {
    user.role == Role::SuperAdmin || user.can_access_all_branches
}

// O conjunto de filiais sobre o qual o usuário pode agir.
// Derivado da identidade da requisição; recalculado a cada chamada e
// nunca cacheado, já que as atribuições podem mudar entre requisições.
#[derive(Debug, Clone)]
pub struct BranchScope {
    pub branch_ids: Vec<Uuid>,
    pub is_all_branches: bool,
}

impl BranchScope {
    pub fn company_wide(branch_ids: Vec<Uuid>) -> Self {
        Self {
            branch_ids,
            is_all_branches: true,
        }
    }

    pub fn assigned(branch_ids: Vec<Uuid>) -> Self {
        Self {
            branch_ids,
            is_all_branches: false,
        }
    }

    pub fn contains(&self, branch_id: Uuid) -> bool {
        self.branch_ids.contains(&branch_id)
    }

    pub fn branch_count(&self) -> usize {
        self.branch_ids.len()
    }
}

/// Resolve o escopo de filiais do usuário autenticado.
///
/// Nunca falha por regra de negócio: uma lista vazia é um escopo válido e
/// produz resultados vazios rio abaixo, não um erro.
pub async fn resolve_branch_scope(
    branch_repo: &BranchRepository,
    user: &AuthUser,
) -> Result<BranchScope, AppError> {
    if has_company_wide_access(user) {
        // Única leitura no banco deste caminho: todas as filiais da empresa.
        let all_ids = branch_repo.ids_for_company(user.company_id).await?;
        return Ok(BranchScope::company_wide(all_ids));
    }

    // A lista já veio anexada à identidade autenticada; zero consultas.
    Ok(BranchScope::assigned(user.branch_ids.clone()))
}

/// Guard de acesso a uma única filial, usado pelas rotas de escrita/leitura
/// por filial (pacientes, agendamentos).
///
/// "Não existe" e "existe mas é de outra empresa" colapsam ambos em
/// `BranchNotFound`; só responde `BranchAccessDenied` quando a filial é
/// visivelmente da empresa do usuário mas ele não tem atribuição.
pub async fn assert_branch_access(
    branch_repo: &BranchRepository,
    user: &AuthUser,
    branch_id: Uuid,
) -> Result<(), AppError> {
    let branch = branch_repo
        .find_by_id_and_company(branch_id, user.company_id)
        .await?;

    if branch.is_none() {
        return Err(AppError::BranchNotFound);
    }

    if has_company_wide_access(user) || user.branch_ids.contains(&branch_id) {
        return Ok(());
    }

    Err(AppError::BranchAccessDenied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_user(can_access_all: bool, branch_ids: Vec<Uuid>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "staff@acmemedtransport.com".to_string(),
            name: "Staff".to_string(),
            role: Role::Staff,
            company_id: Uuid::new_v4(),
            can_access_all_branches: can_access_all,
            branch_ids,
        }
    }

    #[test]
    fn super_admin_tem_acesso_total() {
        let mut user = staff_user(false, vec![]);
        user.role = Role::SuperAdmin;
        assert!(has_company_wide_access(&user));
    }

    #[test]
    fn staff_coringa_tem_acesso_total_sem_ser_admin() {
        let user = staff_user(true, vec![]);
        assert!(has_company_wide_access(&user));
    }

    #[test]
    fn staff_comum_nao_tem_acesso_total() {
        let user = staff_user(false, vec![Uuid::new_v4()]);
        assert!(!has_company_wide_access(&user));
    }

    #[test]
    fn escopo_atribuido_repassa_exatamente_as_filiais_do_usuario() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let scope = BranchScope::assigned(vec![b1, b2]);

        assert!(!scope.is_all_branches);
        assert_eq!(scope.branch_ids, vec![b1, b2]);
        assert_eq!(scope.branch_count(), 2);
    }

    #[test]
    fn escopo_vazio_e_valido() {
        let scope = BranchScope::assigned(vec![]);
        assert_eq!(scope.branch_count(), 0);
        assert!(!scope.contains(Uuid::new_v4()));
    }

    #[test]
    fn pertencimento_ao_escopo() {
        let dentro = Uuid::new_v4();
        let fora = Uuid::new_v4();
        let scope = BranchScope::company_wide(vec![dentro]);

        assert!(scope.is_all_branches);
        assert!(scope.contains(dentro));
        assert!(!scope.contains(fora));
    }
}
