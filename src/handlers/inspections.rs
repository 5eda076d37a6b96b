// src/handlers/inspections.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        rbac::{PermDevicesRead, PermInspectionsWrite, RequirePermission},
        tenancy::TenantScope,
    },
    models::inspection::{RecordPhysicalPayload, RecordTechnicalPayload},
};

#[utoipa::path(
    post,
    path = "/api/devices/{id}/inspections/physical",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    request_body = RecordPhysicalPayload,
    responses(
        (status = 201, description = "Registro gravado; status avançou junto"),
        (status = 422, description = "Dispositivo fora do funil de inspeção física"),
        (status = 409, description = "Mutação concorrente venceu a corrida"),
    ),
    security(("api_jwt" = []))
)]
pub async fn record_physical(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermInspectionsWrite>,
    Path(device_id): Path<Uuid>,
    Json(payload): Json<RecordPhysicalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state
        .inspection_service
        .record_physical(&app_state.db_pool, &scope, device_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(record)))
}

#[utoipa::path(
    post,
    path = "/api/devices/{id}/inspections/technical",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    request_body = RecordTechnicalPayload,
    responses(
        (status = 201, description = "Registro gravado; veredito decidiu o próximo estado"),
        (status = 422, description = "Dispositivo fora da etapa técnica"),
    ),
    security(("api_jwt" = []))
)]
pub async fn record_technical(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermInspectionsWrite>,
    Path(device_id): Path<Uuid>,
    Json(payload): Json<RecordTechnicalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state
        .inspection_service
        .record_technical(&app_state.db_pool, &scope, device_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(record)))
}

#[utoipa::path(
    get,
    path = "/api/devices/{id}/inspections",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    responses((status = 200, description = "Histórico completo, ordenado por criação")),
    security(("api_jwt" = []))
)]
pub async fn inspection_history(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesRead>,
    Path(device_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state
        .inspection_service
        .history(&app_state.db_pool, &scope, device_id)
        .await?;

    Ok(ApiResponse::new(history))
}
