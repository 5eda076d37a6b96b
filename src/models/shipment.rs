// src/models/shipment.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::device::DeviceStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Leilões Corporativos SP")]
    pub name: String,

    pub contact_phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub vendor_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-05-20")]
    pub delivery_date: NaiveDate,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Rollups (sempre derivados, nunca armazenados)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: DeviceStatus,
    pub count: i64,
}

/// Remessa + contagem derivada de dispositivos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentSummary {
    #[serde(flatten)]
    pub shipment: Shipment,

    /// Sempre igual ao COUNT vivo de devices com este shipment_id.
    pub device_count: i64,
}

/// Detalhe de uma remessa com a quebra por status.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetail {
    #[serde(flatten)]
    pub shipment: Shipment,

    pub device_count: i64,
    pub status_breakdown: Vec<StatusCount>,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorPayload {
    #[validate(length(min = 1, message = "O nome do fornecedor é obrigatório."))]
    pub name: String,

    pub contact_phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentPayload {
    pub vendor_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-05-20")]
    pub delivery_date: NaiveDate,

    pub notes: Option<String>,
}
