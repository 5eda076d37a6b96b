// src/models/device.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. O ciclo de vida do dispositivo
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "device_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Received,
    PendingInspection,
    InPhysicalInspection,
    InTechnicalInspection,
    ReadyForSale,
    NeedsRepair,
    InRepair,
    InBranch,
    Sold,
    Scrap,
}

impl DeviceStatus {
    /// A tabela de transições legais, inteira, num único lugar.
    /// Todos os pontos de mutação (inspeção, reparo, venda, transferência,
    /// sucateamento) passam por aqui — nunca reimplemente as arestas no handler.
    pub fn can_transition_to(self, target: DeviceStatus) -> bool {
        use DeviceStatus::*;

        // Qualquer estado não-terminal pode ir para SCRAP.
        if target == Scrap {
            return !self.is_terminal();
        }

        matches!(
            (self, target),
            (Received, PendingInspection)
                | (PendingInspection, InPhysicalInspection)
                | (InPhysicalInspection, InTechnicalInspection)
                // Reprovou na inspeção física: vai direto para a fila de reparo.
                | (InPhysicalInspection, NeedsRepair)
                | (InTechnicalInspection, ReadyForSale)
                | (InTechnicalInspection, NeedsRepair)
                | (NeedsRepair, InRepair)
                | (InRepair, ReadyForSale)
                | (InRepair, NeedsRepair)
                | (ReadyForSale, InBranch)
                | (ReadyForSale, Sold)
                // A filial pode vender ou devolver ao armazém.
                | (InBranch, Sold)
                | (InBranch, ReadyForSale)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeviceStatus::Sold | DeviceStatus::Scrap)
    }
}

// ---
// 2. O Dispositivo
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub shipment_id: Option<Uuid>,

    /// Identificador humano, único por empresa (ex: "NB-2024-0042").
    #[schema(example = "NB-2024-0042")]
    pub asset_id: String,

    #[schema(example = "ThinkPad T480")]
    pub model: String,

    pub serial_number: String,

    #[schema(example = "Lenovo")]
    pub manufacturer: String,

    pub status: DeviceStatus,

    #[schema(example = "warehouse")]
    pub current_location: String,

    #[schema(example = "850.00")]
    pub purchase_price: Decimal,

    /// Aposentadoria lógica de unidades vendidas (nunca apagamos a linha).
    pub retired: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevicePayload {
    #[validate(length(min = 1, message = "O assetId é obrigatório."))]
    pub asset_id: String,

    #[validate(length(min = 1, message = "O modelo é obrigatório."))]
    pub model: String,

    #[validate(length(min = 1, message = "O número de série é obrigatório."))]
    pub serial_number: String,

    #[validate(length(min = 1, message = "O fabricante é obrigatório."))]
    pub manufacturer: String,

    /// Remessa de origem. Opcional: entrada manual não tem remessa.
    pub shipment_id: Option<Uuid>,

    #[serde(default)]
    pub purchase_price: Decimal,

    pub current_location: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferDevicePayload {
    #[validate(length(min = 1, message = "O destino da transferência é obrigatório."))]
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::DeviceStatus::*;
    use super::*;

    const ALL: [DeviceStatus; 10] = [
        Received,
        PendingInspection,
        InPhysicalInspection,
        InTechnicalInspection,
        ReadyForSale,
        NeedsRepair,
        InRepair,
        InBranch,
        Sold,
        Scrap,
    ];

    #[test]
    fn happy_path_to_sale() {
        assert!(Received.can_transition_to(PendingInspection));
        assert!(PendingInspection.can_transition_to(InPhysicalInspection));
        assert!(InPhysicalInspection.can_transition_to(InTechnicalInspection));
        assert!(InTechnicalInspection.can_transition_to(ReadyForSale));
        assert!(ReadyForSale.can_transition_to(Sold));
    }

    #[test]
    fn repair_loop() {
        assert!(InTechnicalInspection.can_transition_to(NeedsRepair));
        assert!(InPhysicalInspection.can_transition_to(NeedsRepair));
        assert!(NeedsRepair.can_transition_to(InRepair));
        assert!(InRepair.can_transition_to(ReadyForSale));
        // Reprovou na re-checagem: volta para a fila.
        assert!(InRepair.can_transition_to(NeedsRepair));
    }

    #[test]
    fn branch_transfer_and_back() {
        assert!(ReadyForSale.can_transition_to(InBranch));
        assert!(InBranch.can_transition_to(Sold));
        assert!(InBranch.can_transition_to(ReadyForSale));
    }

    #[test]
    fn every_non_terminal_state_can_be_scrapped() {
        for from in ALL {
            assert_eq!(from.can_transition_to(Scrap), !from.is_terminal());
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for target in ALL {
            assert!(!Sold.can_transition_to(target));
            assert!(!Scrap.can_transition_to(target));
        }
    }

    #[test]
    fn illegal_shortcuts_are_rejected() {
        // Pular etapas do funil não é permitido.
        assert!(!Received.can_transition_to(ReadyForSale));
        assert!(!Received.can_transition_to(Sold));
        assert!(!PendingInspection.can_transition_to(InTechnicalInspection));
        assert!(!NeedsRepair.can_transition_to(ReadyForSale));
        assert!(!InRepair.can_transition_to(Sold));
        // Venda exige passar pelo funil de inspeção.
        assert!(!NeedsRepair.can_transition_to(Sold));
        // Não existe "des-vender".
        assert!(!Sold.can_transition_to(ReadyForSale));
    }

    #[test]
    fn no_self_transitions() {
        for s in ALL {
            assert!(!s.can_transition_to(s));
        }
    }
}
