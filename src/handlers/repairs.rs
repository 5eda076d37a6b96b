// src/handlers/repairs.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        rbac::{PermRepairsAssign, PermRepairsWrite, RequirePermission},
        tenancy::TenantScope,
    },
    models::repair::{
        AssignRepairPayload, CompleteRepairPayload, CreateRepairPayload, RepairStatus,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRepairsQuery {
    pub status: Option<RepairStatus>,
}

#[utoipa::path(
    post,
    path = "/api/repairs",
    tag = "Repairs",
    request_body = CreateRepairPayload,
    responses(
        (status = 201, description = "Reparo criado; dispositivo foi para IN_REPAIR"),
        (status = 422, description = "Dispositivo não está em NEEDS_REPAIR"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_repair(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsWrite>,
    Json(payload): Json<CreateRepairPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let repair = app_state
        .repair_service
        .create_repair(&app_state.db_pool, &scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(repair)))
}

#[utoipa::path(
    get,
    path = "/api/repairs",
    tag = "Repairs",
    params(ListRepairsQuery),
    responses((status = 200, description = "Reparos da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_repairs(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsWrite>,
    Query(query): Query<ListRepairsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repairs = app_state
        .repair_service
        .list_repairs(&app_state.db_pool, &scope, query.status)
        .await?;

    Ok(ApiResponse::new(repairs))
}

#[utoipa::path(
    get,
    path = "/api/repairs/{id}",
    tag = "Repairs",
    params(("id" = Uuid, Path, description = "ID do reparo")),
    responses((status = 200, description = "Reparo"), (status = 404, description = "Não encontrado")),
    security(("api_jwt" = []))
)]
pub async fn get_repair(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repair = app_state
        .repair_service
        .get_repair(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(repair))
}

#[utoipa::path(
    post,
    path = "/api/repairs/{id}/assign",
    tag = "Repairs",
    params(("id" = Uuid, Path, description = "ID do reparo")),
    request_body = AssignRepairPayload,
    responses(
        (status = 200, description = "Atribuído"),
        (status = 400, description = "Designado sem papel de reparo"),
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_repair(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsAssign>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRepairPayload>,
) -> Result<impl IntoResponse, AppError> {
    let repair = app_state
        .repair_service
        .assign_repair(&app_state.db_pool, &scope, id, payload.assigned_to)
        .await?;

    Ok(ApiResponse::new(repair))
}

#[utoipa::path(
    post,
    path = "/api/repairs/{id}/start",
    tag = "Repairs",
    params(("id" = Uuid, Path, description = "ID do reparo")),
    responses((status = 200, description = "PENDING -> IN_PROGRESS")),
    security(("api_jwt" = []))
)]
pub async fn start_repair(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repair = app_state
        .repair_service
        .start_repair(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(repair))
}

#[utoipa::path(
    post,
    path = "/api/repairs/{id}/complete",
    tag = "Repairs",
    params(("id" = Uuid, Path, description = "ID do reparo")),
    request_body = CompleteRepairPayload,
    responses(
        (status = 200, description = "Concluído; dispositivo voltou ao funil"),
        (status = 409, description = "Mutação concorrente venceu a corrida"),
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_repair(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteRepairPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let repair = app_state
        .repair_service
        .complete_repair(&app_state.db_pool, &scope, id, &payload)
        .await?;

    Ok(ApiResponse::new(repair))
}

#[utoipa::path(
    post,
    path = "/api/repairs/{id}/cancel",
    tag = "Repairs",
    params(("id" = Uuid, Path, description = "ID do reparo")),
    responses((status = 200, description = "Cancelado")),
    security(("api_jwt" = []))
)]
pub async fn cancel_repair(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermRepairsWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repair = app_state
        .repair_service
        .cancel_repair(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(repair))
}
