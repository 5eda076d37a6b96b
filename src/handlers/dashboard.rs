// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        rbac::{PermFinanceRead, RequirePermission},
        tenancy::TenantScope,
    },
};

#[utoipa::path(
    get,
    path = "/api/dashboard/finance",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Receita, custo, lucro, recebido e em aberto",
         body = crate::models::dashboard::FinanceDashboard),
    ),
    security(("api_jwt" = []))
)]
pub async fn get_finance_dashboard(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermFinanceRead>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state
        .dashboard_service
        .get_dashboard(&app_state.db_pool, scope.company_id)
        .await?;

    Ok(ApiResponse::new(dashboard))
}
