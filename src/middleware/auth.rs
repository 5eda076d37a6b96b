// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantScope,
    models::auth::User,
};

// O middleware de autenticação: valida o Bearer token e insere o usuário
// nos "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = bearer.ok_or(AppError::Unauthenticated)?;

    let user = app_state.auth_service.validate_token(auth.token()).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Autenticação + resolução do escopo de tenant numa única camada.
// Rotas de negócio usam este guard; o TenantScope fica disponível como
// extrator nos handlers.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = bearer.ok_or(AppError::Unauthenticated)?;

    let user = app_state.auth_service.validate_token(auth.token()).await?;
    let scope = TenantScope::resolve(&user, request.headers())?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(scope);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthenticated)
    }
}
