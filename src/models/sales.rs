// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// ---
// 1. Cliente (o comprador)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Carlos Pereira ME")]
    pub name: String,

    #[schema(example = "+55 81 99999-0000")]
    pub phone: String,

    pub email: Option<String>,

    /// Dívida em aberto. Mutada apenas pelo ciclo de vida das faturas:
    /// finalizar soma o total, pagamento subtrai.
    #[schema(example = "350.00")]
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Fatura
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Finalized,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub client_id: Uuid,
    pub status: InvoiceStatus,

    #[schema(example = "1500.00")]
    pub total_amount: Decimal,

    #[schema(example = "500.00")]
    pub amount_paid: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub device_id: Uuid,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayment {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub method: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fatura + itens, para exibição de detalhe.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,

    pub items: Vec<InvoiceItem>,
    pub payments: Vec<InvoicePayment>,
}

// ---
// 3. Regras puras
// ---

/// Invariante: Σ pagamentos nunca excede o total da fatura.
/// Atingir a igualdade é permitido; ultrapassar é rejeitado na escrita.
pub fn validate_payment(
    total_amount: Decimal,
    amount_paid: Decimal,
    payment: Decimal,
) -> Result<(), AppError> {
    if payment <= Decimal::ZERO {
        return Err(AppError::ValidationFailed(
            "O valor do pagamento deve ser positivo.".into(),
        ));
    }
    if amount_paid + payment > total_amount {
        return Err(AppError::ValidationFailed(
            "O pagamento excede o saldo devedor da fatura.".into(),
        ));
    }
    Ok(())
}

// ---
// 4. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub name: String,

    #[validate(length(min = 8, message = "O telefone é obrigatório."))]
    pub phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemPayload {
    pub device_id: Uuid,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "A fatura precisa de ao menos um item."))]
    pub items: Vec<InvoiceItemPayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    pub amount: Decimal,
    pub method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn payment_up_to_the_total_is_accepted() {
        assert!(validate_payment(dec("1000.00"), dec("0"), dec("400.00")).is_ok());
        // Igualdade exata é permitida.
        assert!(validate_payment(dec("1000.00"), dec("600.00"), dec("400.00")).is_ok());
    }

    #[test]
    fn payment_beyond_the_total_is_rejected() {
        let err = validate_payment(dec("1000.00"), dec("600.00"), dec("400.01")).unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)));
    }

    #[test]
    fn non_positive_payments_are_rejected() {
        assert!(validate_payment(dec("100.00"), dec("0"), Decimal::ZERO).is_err());
        assert!(validate_payment(dec("100.00"), dec("0"), dec("-5.00")).is_err());
    }

    #[test]
    fn exact_decimal_arithmetic_without_float_drift() {
        // 0.1 + 0.2 == 0.3 em Decimal (ao contrário de f64).
        assert!(validate_payment(dec("0.30"), dec("0.10"), dec("0.20")).is_ok());
        assert!(validate_payment(dec("0.30"), dec("0.10"), dec("0.21")).is_err());
    }
}
