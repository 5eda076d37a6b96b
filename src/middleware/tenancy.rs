// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User, models::rbac::Role};

// Cabeçalho usado pelo SUPER_ADMIN para escolher a empresa-alvo.
// Usuários comuns carregam a empresa na própria linha e ignoram o cabeçalho.
const COMPANY_ID_HEADER: &str = "x-company-id";

// O contexto de identidade resolvido: quem é o ator, em qual empresa ele
// está agindo e com qual papel. Todas as operações de negócio recebem este
// contexto como parâmetro explícito — nunca estado global.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: Role,
}

impl TenantScope {
    /// Resolve o escopo efetivo a partir do usuário autenticado.
    pub fn resolve(user: &User, headers: &HeaderMap) -> Result<Self, AppError> {
        let company_id = match (user.role, user.company_id) {
            // SUPER_ADMIN é supra-tenant: a empresa-alvo vem do cabeçalho.
            (Role::SuperAdmin, _) => {
                let value = headers.get(COMPANY_ID_HEADER).ok_or_else(|| {
                    AppError::ValidationFailed(
                        "O cabeçalho X-Company-Id é obrigatório para SUPER_ADMIN.".to_string(),
                    )
                })?;
                let value_str = value.to_str().map_err(|_| {
                    AppError::ValidationFailed(
                        "Cabeçalho X-Company-Id contém caracteres inválidos.".to_string(),
                    )
                })?;
                Uuid::parse_str(value_str).map_err(|_| {
                    AppError::ValidationFailed(
                        "Cabeçalho X-Company-Id inválido (não é um UUID).".to_string(),
                    )
                })?
            }

            // Papéis comuns agem sempre na própria empresa.
            (_, Some(company_id)) => company_id,

            // Usuário sem empresa e sem papel supra-tenant não acessa nada.
            (_, None) => return Err(AppError::Forbidden),
        };

        Ok(Self {
            user_id: user.id,
            company_id,
            role: user.role,
        })
    }

    /// Checagem de posse de recurso: função pura de
    /// (papel, empresa do ator, empresa do recurso).
    pub fn ensure_owns(&self, resource_company_id: Uuid) -> Result<(), AppError> {
        if self.company_id == resource_company_id {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantScope>()
            .copied()
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, company_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            company_id,
            email: "t@t.com".into(),
            password_hash: "x".into(),
            full_name: "Teste".into(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn regular_user_scopes_to_own_company() {
        let company = Uuid::new_v4();
        let u = user(Role::WarehouseManager, Some(company));
        let scope = TenantScope::resolve(&u, &HeaderMap::new()).unwrap();
        assert_eq!(scope.company_id, company);
    }

    #[test]
    fn regular_user_without_company_is_forbidden() {
        let u = user(Role::SalesStaff, None);
        let err = TenantScope::resolve(&u, &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn super_admin_picks_company_via_header() {
        let target = Uuid::new_v4();
        let u = user(Role::SuperAdmin, None);

        let mut headers = HeaderMap::new();
        headers.insert(COMPANY_ID_HEADER, target.to_string().parse().unwrap());

        let scope = TenantScope::resolve(&u, &headers).unwrap();
        assert_eq!(scope.company_id, target);
    }

    #[test]
    fn super_admin_without_header_fails() {
        let u = user(Role::SuperAdmin, None);
        assert!(TenantScope::resolve(&u, &HeaderMap::new()).is_err());
    }

    #[test]
    fn cross_company_ownership_is_forbidden() {
        let scope = TenantScope {
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(scope.ensure_owns(scope.company_id).is_ok());
        assert!(matches!(
            scope.ensure_owns(Uuid::new_v4()).unwrap_err(),
            AppError::Forbidden
        ));
    }
}
