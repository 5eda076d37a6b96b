// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_tier", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyTier {
    Basic,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    Active,
    Suspended,
}

// ---
// A Empresa (a fronteira de tenant)
// ---
// Todo Device, Client, Shipment e Repair resolve para exatamente uma empresa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,

    #[schema(example = "TecnoUsados Recife LTDA")]
    pub name: String,

    pub subscription_tier: CompanyTier,
    pub status: CompanyStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Payload de criação: campos opcionais enumerados explicitamente, com
// defaults fixos. Campos desconhecidos são rejeitados na borda.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub name: String,

    pub subscription_tier: Option<CompanyTier>,
    pub status: Option<CompanyStatus>,
}

impl CreateCompanyPayload {
    pub fn tier(&self) -> CompanyTier {
        self.subscription_tier.unwrap_or(CompanyTier::Basic)
    }

    pub fn initial_status(&self) -> CompanyStatus {
        self.status.unwrap_or(CompanyStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"name": "Loja X", "subscriptionTier": "PRO", "cnpj": "123"}"#;
        let parsed: Result<CreateCompanyPayload, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let raw = r#"{"name": "Loja X"}"#;
        let parsed: CreateCompanyPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.tier(), CompanyTier::Basic);
        assert_eq!(parsed.initial_status(), CompanyStatus::Active);
    }
}
