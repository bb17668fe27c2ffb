use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ---
// Falhas do validador de intervalo
// ---
// Cada razão de falha é uma variante própria (e não uma string genérica)
// para que a camada HTTP faça um match exaustivo. A validação falha na
// primeira regra violada, na ordem: from, to, ordem, tamanho.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("INVALID_FROM")]
    InvalidFrom,
    #[error("INVALID_TO")]
    InvalidTo,
    #[error("INVALID_RANGE")]
    InvalidRange,
    #[error("RANGE_TOO_LARGE")]
    RangeTooLarge,
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Cobre também o caso "existe, mas é de outra empresa / fora do escopo":
    // as duas situações são deliberadamente indistinguíveis na resposta,
    // para não confirmar a existência de filiais alheias.
    #[error("Filial não encontrada")]
    BranchNotFound,

    #[error("Sem autorização para esta filial")]
    BranchAccessDenied,

    #[error("Apenas administradores podem executar esta ação")]
    AdminOnly,

    #[error("Hospital não encontrado")]
    HospitalNotFound,

    #[error("Hospital em uso por {0} agendamento(s)")]
    HospitalInUse(i64),

    #[error("Paciente não encontrado nesta filial")]
    PatientNotInBranch,

    #[error("O campo '{0}' é obrigatório")]
    EmptyField(&'static str),

    #[error("Data de nascimento inválida")]
    InvalidDateOfBirth,

    #[error("Horários do agendamento inválidos")]
    InvalidShiftTimes,

    #[error("O parâmetro '{0}' é obrigatório (data ISO)")]
    MissingRangeParam(&'static str),

    #[error("Intervalo de datas inválido: {0}")]
    InvalidDateRange(#[from] RangeError),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string()),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),

            AppError::BranchNotFound => (
                StatusCode::NOT_FOUND,
                "Filial não encontrada ou não autorizada.".to_string(),
            ),
            AppError::BranchAccessDenied => (
                StatusCode::FORBIDDEN,
                "Sem autorização para esta filial.".to_string(),
            ),
            AppError::AdminOnly => (
                StatusCode::FORBIDDEN,
                "Apenas administradores podem executar esta ação.".to_string(),
            ),

            AppError::HospitalNotFound => (StatusCode::NOT_FOUND, "Hospital não encontrado.".to_string()),
            AppError::HospitalInUse(count) => (
                StatusCode::CONFLICT,
                format!(
                    "Hospital em uso por {} agendamento(s). Remaneje ou exclua esses agendamentos primeiro.",
                    count
                ),
            ),

            AppError::PatientNotInBranch => (
                StatusCode::BAD_REQUEST,
                "Paciente não encontrado nesta filial.".to_string(),
            ),
            AppError::EmptyField(field) => (
                StatusCode::BAD_REQUEST,
                format!("O campo '{}' é obrigatório.", field),
            ),
            AppError::InvalidDateOfBirth => (
                StatusCode::BAD_REQUEST,
                "dateOfBirth deve ser uma data válida (YYYY-MM-DD).".to_string(),
            ),
            AppError::InvalidShiftTimes => (
                StatusCode::BAD_REQUEST,
                "startTime/endTime devem ser instantes ISO válidos, com endTime após startTime.".to_string(),
            ),

            AppError::MissingRangeParam(param) => (
                StatusCode::BAD_REQUEST,
                format!("O parâmetro '{}' é obrigatório (data ISO).", param),
            ),

            // Match exaustivo: cada código do validador vira a sua mensagem.
            AppError::InvalidDateRange(range_err) => {
                let message = match range_err {
                    RangeError::InvalidFrom => "'from' deve ser uma data ISO válida.",
                    RangeError::InvalidTo => "'to' deve ser uma data ISO válida.",
                    RangeError::InvalidRange => "'to' deve ser posterior a 'from'.",
                    RangeError::RangeTooLarge => "Intervalo muito grande. O máximo é de 31 dias.",
                };
                (StatusCode::BAD_REQUEST, message.to_string())
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
