// src/handlers/shipments.rs

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
        rbac::{PermShipmentsRead, PermShipmentsWrite, RequirePermission},
        tenancy::TenantScope,
    },
    models::shipment::{CreateShipmentPayload, CreateVendorPayload},
};

#[utoipa::path(
    post,
    path = "/api/vendors",
    tag = "Shipments",
    request_body = CreateVendorPayload,
    responses(
        (status = 201, description = "Fornecedor criado"),
        (status = 409, description = "Nome duplicado na empresa"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vendor(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermShipmentsWrite>,
    Json(payload): Json<CreateVendorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vendor = app_state
        .shipment_service
        .create_vendor(&app_state.db_pool, &scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(vendor)))
}

#[utoipa::path(
    get,
    path = "/api/vendors",
    tag = "Shipments",
    responses((status = 200, description = "Fornecedores da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_vendors(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermShipmentsRead>,
) -> Result<impl IntoResponse, AppError> {
    let vendors = app_state
        .shipment_service
        .list_vendors(&app_state.db_pool, &scope)
        .await?;

    Ok(ApiResponse::new(vendors))
}

#[utoipa::path(
    post,
    path = "/api/shipments",
    tag = "Shipments",
    request_body = CreateShipmentPayload,
    responses(
        (status = 201, description = "Remessa criada (vazia)"),
        (status = 404, description = "Fornecedor não encontrado nesta empresa"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_shipment(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermShipmentsWrite>,
    Json(payload): Json<CreateShipmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let shipment = app_state
        .shipment_service
        .create_shipment(&app_state.db_pool, &scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(shipment)))
}

#[utoipa::path(
    get,
    path = "/api/shipments",
    tag = "Shipments",
    responses((status = 200, description = "Remessas com device_count derivado")),
    security(("api_jwt" = []))
)]
pub async fn list_shipments(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermShipmentsRead>,
) -> Result<impl IntoResponse, AppError> {
    let shipments = app_state
        .shipment_service
        .list_shipments(&app_state.db_pool, &scope)
        .await?;

    Ok(ApiResponse::new(shipments))
}

#[utoipa::path(
    get,
    path = "/api/shipments/{id}",
    tag = "Shipments",
    params(("id" = Uuid, Path, description = "ID da remessa")),
    responses((status = 200, description = "Detalhe com quebra por status")),
    security(("api_jwt" = []))
)]
pub async fn get_shipment(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermShipmentsRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .shipment_service
        .get_shipment_detail(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(detail))
}
