// src/models/inspection.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Registros de inspeção
// ---
// Ambos são append-only: uma vez gravados, nunca são alterados. Um mesmo
// dispositivo acumula vários registros ao longo da vida (re-inspeção pós
// reparo), ordenados por created_at.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalInspection {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub device_id: Uuid,
    pub inspector_id: Uuid,

    #[schema(example = "Arranhões leves na tampa")]
    pub chassis_condition: String,

    pub screen_ok: bool,
    pub keyboard_ok: bool,
    pub ports_ok: bool,

    /// Veredito da passada física.
    pub passed: bool,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tech_verdict", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechVerdict {
    Ready,
    NeedsRepair,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalInspection {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub device_id: Uuid,
    pub inspector_id: Uuid,

    pub cpu_ok: bool,
    pub ram_ok: bool,
    pub disk_ok: bool,

    /// Saúde da bateria em percentual (0-100).
    #[schema(example = 87)]
    pub battery_health: i32,

    pub boots: bool,

    pub verdict: TechVerdict,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPhysicalPayload {
    #[validate(length(min = 1, message = "A condição do chassi é obrigatória."))]
    pub chassis_condition: String,

    pub screen_ok: bool,
    pub keyboard_ok: bool,
    pub ports_ok: bool,
    pub passed: bool,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTechnicalPayload {
    pub cpu_ok: bool,
    pub ram_ok: bool,
    pub disk_ok: bool,

    #[validate(range(min = 0, max = 100, message = "battery_health deve estar entre 0 e 100."))]
    pub battery_health: i32,

    pub boots: bool,
    pub verdict: TechVerdict,

    pub notes: Option<String>,
}

/// Histórico combinado de um dispositivo, para exibição.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionHistory {
    pub physical: Vec<PhysicalInspection>,
    pub technical: Vec<TechnicalInspection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_health_must_be_a_percentage() {
        let payload = RecordTechnicalPayload {
            cpu_ok: true,
            ram_ok: true,
            disk_ok: true,
            battery_health: 140,
            boots: true,
            verdict: TechVerdict::Ready,
            notes: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn physical_payload_requires_chassis_condition() {
        let payload = RecordPhysicalPayload {
            chassis_condition: "".into(),
            screen_ok: true,
            keyboard_ok: true,
            ports_ok: true,
            passed: true,
            notes: None,
        };
        assert!(payload.validate().is_err());
    }
}
