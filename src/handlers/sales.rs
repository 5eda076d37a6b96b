// src/handlers/sales.rs

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
        rbac::{PermSalesRead, PermSalesWrite, RequirePermission},
        tenancy::TenantScope,
    },
    models::sales::{CreateClientPayload, CreateInvoicePayload, RecordPaymentPayload},
};

// ---
// Clientes
// ---

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Sales",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado"),
        (status = 409, description = "Telefone duplicado na empresa"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesWrite>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state
        .sales_service
        .create_client(&app_state.db_pool, &scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(client)))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Sales",
    responses((status = 200, description = "Clientes da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesRead>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state
        .sales_service
        .list_clients(&app_state.db_pool, &scope)
        .await?;

    Ok(ApiResponse::new(clients))
}

// ---
// Faturas
// ---

#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Sales",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Fatura DRAFT criada com itens"),
        (status = 422, description = "Dispositivo não vendável"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesWrite>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .sales_service
        .create_invoice(&app_state.db_pool, &scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(detail)))
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Sales",
    responses((status = 200, description = "Faturas da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesRead>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state
        .sales_service
        .list_invoices(&app_state.db_pool, &scope)
        .await?;

    Ok(ApiResponse::new(invoices))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses((status = 200, description = "Fatura com itens e pagamentos")),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .sales_service
        .get_invoice_detail(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(detail))
}

#[utoipa::path(
    post,
    path = "/api/invoices/{id}/finalize",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Finalizada; dispositivos vendidos, saldo do cliente somado"),
        (status = 409, description = "Um dispositivo perdeu a corrida de transição"),
    ),
    security(("api_jwt" = []))
)]
pub async fn finalize_invoice(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .sales_service
        .finalize_invoice(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(invoice))
}

#[utoipa::path(
    post,
    path = "/api/invoices/{id}/payments",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = RecordPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado"),
        (status = 400, description = "Pagamento excede o total da fatura"),
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .sales_service
        .record_payment(&app_state.db_pool, &scope, id, &payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(payment)))
}

#[utoipa::path(
    post,
    path = "/api/invoices/{id}/cancel",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses((status = 200, description = "Rascunho cancelado")),
    security(("api_jwt" = []))
)]
pub async fn cancel_invoice(
    State(app_state): State<AppState>,
    scope: TenantScope,
    _guard: RequirePermission<PermSalesWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .sales_service
        .cancel_invoice(&app_state.db_pool, &scope, id)
        .await?;

    Ok(ApiResponse::new(invoice))
}
