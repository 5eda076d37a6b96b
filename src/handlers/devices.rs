// src/handlers/devices.rs

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
        rbac::{
            PermDevicesDelete, PermDevicesRead, PermDevicesScrap, PermDevicesTransfer,
            PermDevicesWrite, RequirePermission,
        },
        tenancy::TenantScope,
    },
    models::device::{CreateDevicePayload, DeviceStatus, TransferDevicePayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicesQuery {
    /// Filtro opcional por status do funil.
    pub status: Option<DeviceStatus>,
}

#[utoipa::path(
    post,
    path = "/api/devices",
    tag = "Devices",
    request_body = CreateDevicePayload,
    responses(
        (status = 201, description = "Dispositivo criado em RECEIVED", body = crate::models::device::Device),
        (status = 409, description = "assetId duplicado na empresa"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_device(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesWrite>,
    Json(payload): Json<CreateDevicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let device = app_state
        .device_service
        .create_device(&app_state.db_pool, &scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(device)))
}

#[utoipa::path(
    get,
    path = "/api/devices",
    tag = "Devices",
    params(ListDevicesQuery),
    responses((status = 200, description = "Dispositivos da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_devices(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesRead>,
    Query(query): Query<ListDevicesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let devices = app_state
        .device_service
        .list_devices(&app_state.db_pool, &scope, query.status)
        .await?;

    Ok(ApiResponse::new(devices))
}

#[utoipa::path(
    get,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    responses(
        (status = 200, description = "Dispositivo", body = crate::models::device::Device),
        (status = 404, description = "Não encontrado nesta empresa"),
    ),
    security(("api_jwt" = []))
)]
pub async fn get_device(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let device = app_state
        .device_service
        .get_device(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(device))
}

#[utoipa::path(
    post,
    path = "/api/devices/{id}/queue-inspection",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    responses(
        (status = 200, description = "RECEIVED -> PENDING_INSPECTION"),
        (status = 422, description = "Transição ilegal"),
    ),
    security(("api_jwt" = []))
)]
pub async fn queue_for_inspection(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let device = app_state
        .device_service
        .queue_for_inspection(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(device))
}

#[utoipa::path(
    post,
    path = "/api/devices/{id}/transfer",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    request_body = TransferDevicePayload,
    responses(
        (status = 200, description = "READY_FOR_SALE -> IN_BRANCH"),
        (status = 422, description = "Transição ilegal"),
    ),
    security(("api_jwt" = []))
)]
pub async fn transfer_device(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesTransfer>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransferDevicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let device = app_state
        .device_service
        .transfer_to_branch(&app_state.db_pool, &scope, id, &payload.destination)
        .await?;

    Ok(ApiResponse::new(device))
}

#[utoipa::path(
    post,
    path = "/api/devices/{id}/return",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    responses((status = 200, description = "IN_BRANCH -> READY_FOR_SALE")),
    security(("api_jwt" = []))
)]
pub async fn return_device(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesTransfer>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let device = app_state
        .device_service
        .return_to_warehouse(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(device))
}

#[utoipa::path(
    post,
    path = "/api/devices/{id}/scrap",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    responses(
        (status = 200, description = "Sucateado"),
        (status = 422, description = "Estado terminal"),
    ),
    security(("api_jwt" = []))
)]
pub async fn scrap_device(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesScrap>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let device = app_state
        .device_service
        .scrap_device(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(device))
}

#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "ID do dispositivo")),
    responses((status = 204, description = "Excluído (físico pré-venda, lógico pós-venda)")),
    security(("api_jwt" = []))
)]
pub async fn delete_device(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermDevicesDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .device_service
        .delete_device(&app_state.db_pool, &scope, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
