// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia de negócio (Unauthenticated, Forbidden, NotFound,
// IllegalTransition, ConflictingTransition, ValidationFailed,
// DeviceNotEligible) vira um status HTTP estável; o resto é infraestrutura.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Identidade e tenant ---
    #[error("Não autenticado")]
    Unauthenticated,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Acesso negado")]
    Forbidden,

    // --- Regras de negócio ---
    #[error("{0} não encontrado(a)")]
    NotFound(String),

    // Vale para as duas máquinas de estado (dispositivo e reparo).
    #[error("Transição ilegal: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    /// A mutação concorrente venceu a corrida; o chamador deve recarregar.
    #[error("O dispositivo foi alterado por outra operação")]
    ConflictingTransition,

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    DeviceNotEligible(String),

    // --- Violações de unicidade ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Já existe um dispositivo com o assetId '{0}' nesta empresa")]
    AssetIdAlreadyExists(String),

    #[error("Já existe um cliente com este telefone nesta empresa")]
    ClientPhoneAlreadyExists,

    #[error("Já existe um fornecedor com o nome '{0}' nesta empresa")]
    VendorNameAlreadyExists(String),

    #[error("Já existe uma empresa com o nome '{0}'")]
    CompanyNameAlreadyExists(String),

    // --- Infraestrutura ---
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn illegal_transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        AppError::IllegalTransition {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }

    /// Mapeamento estável da taxonomia para status HTTP.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::IllegalTransition { .. } | AppError::DeviceNotEligible(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ConflictingTransition
            | AppError::EmailAlreadyExists
            | AppError::AssetIdAlreadyExists(_)
            | AppError::ClientPhoneAlreadyExists
            | AppError::VendorNameAlreadyExists(_)
            | AppError::CompanyNameAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Validação retorna todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "success": false,
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let status = self.status_code();

        // Erros de infraestrutura não vazam detalhes para o cliente;
        // o tracing guarda a mensagem completa.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
            "Ocorreu um erro inesperado.".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "success": false, "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_stable_status_codes() {
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("Dispositivo".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::IllegalTransition {
                from: "RECEIVED".into(),
                to: "SOLD".into()
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::ConflictingTransition.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DeviceNotEligible("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::ValidationFailed("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
