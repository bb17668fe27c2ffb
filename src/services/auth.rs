// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthUser, Claims, User},
};

// E-mails são comparados já aparados e em minúsculas.
pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = normalize_email(email);

        // Usuário inexistente e senha errada respondem o MESMO erro.
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação de bcrypt em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&user)
    }

    /// Valida o token e monta a identidade da requisição.
    ///
    /// As atribuições de filial NÃO viajam no token: são recarregadas do
    /// banco a cada requisição, então revogar uma atribuição vale já na
    /// chamada seguinte, sem esperar o token expirar.
    pub async fn validate_token(&self, token: &str) -> Result<AuthUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;

        // O par (id, empresa) precisa continuar existindo no banco.
        let user = self
            .user_repo
            .find_by_id_and_company(claims.sub, claims.company_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let branch_ids = self.user_repo.branch_ids_for_user(user.id).await?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            company_id: user.company_id,
            can_access_all_branches: user.can_access_all_branches,
            branch_ids,
        })
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user.id,
            company_id: user.company_id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_e_aparado_e_minusculo() {
        assert_eq!(
            normalize_email("  Manager@AcmeMedTransport.com  "),
            "manager@acmemedtransport.com"
        );
    }
}
