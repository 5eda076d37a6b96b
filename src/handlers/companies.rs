// src/handlers/companies.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantScope},
    models::{company::CreateCompanyPayload, rbac::Role},
};

// Onboarding de empresas é atribuição do papel supra-tenant.
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada", body = crate::models::company::Company),
        (status = 403, description = "Apenas SUPER_ADMIN"),
        (status = 409, description = "Nome já existe"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    if user.role != Role::SuperAdmin {
        return Err(AppError::Forbidden);
    }

    payload.validate()?;

    let company = app_state.company_service.create_company(&payload).await?;

    Ok((StatusCode::CREATED, ApiResponse::new(company)))
}

#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    responses((status = 200, description = "Todas as empresas (supra-tenant)")),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    if user.role != Role::SuperAdmin {
        return Err(AppError::Forbidden);
    }

    let companies = app_state.company_service.list_companies().await?;
    Ok(ApiResponse::new(companies))
}

#[utoipa::path(
    get,
    path = "/api/companies/me",
    tag = "Companies",
    responses((status = 200, description = "A empresa do escopo atual")),
    security(("api_jwt" = []))
)]
pub async fn get_my_company(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.get_company(scope.company_id).await?;
    Ok(ApiResponse::new(company))
}
