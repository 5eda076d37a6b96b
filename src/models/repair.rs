// src/models/repair.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "repair_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RepairStatus {
    /// pending → in_progress → completed; cancelled a partir de qualquer
    /// estado não-terminal.
    pub fn can_transition_to(self, target: RepairStatus) -> bool {
        use RepairStatus::*;

        if target == Cancelled {
            return !self.is_terminal();
        }

        matches!((self, target), (Pending, InProgress) | (InProgress, Completed))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RepairStatus::Completed | RepairStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "repair_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairPriority {
    Low,
    Medium,
    High,
    Urgent,
}

// ---
// O Reparo (item de trabalho mutável, ao contrário das inspeções)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Repair {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub device_id: Uuid,

    #[schema(example = "Teclado com teclas mortas, trocar membrana")]
    pub issue_description: String,

    pub assigned_to: Option<Uuid>,
    pub priority: RepairPriority,
    pub status: RepairStatus,

    pub completion_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepairPayload {
    pub device_id: Uuid,

    #[validate(length(min = 1, message = "A descrição do problema é obrigatória."))]
    pub issue_description: String,

    pub priority: Option<RepairPriority>,

    /// Atribuição imediata a um técnico (opcional).
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRepairPayload {
    pub assigned_to: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRepairPayload {
    #[validate(length(min = 1, message = "A nota de conclusão é obrigatória."))]
    pub completion_notes: String,

    /// Resultado da re-checagem: aprovado volta para READY_FOR_SALE,
    /// reprovado volta para NEEDS_REPAIR.
    pub recheck_passed: bool,
}

#[cfg(test)]
mod tests {
    use super::RepairStatus::*;
    use super::*;

    #[test]
    fn linear_flow() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn cancel_from_any_non_terminal_state() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for target in [Pending, InProgress, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(target));
            assert!(!Cancelled.can_transition_to(target));
        }
    }

    #[test]
    fn no_backwards_movement() {
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
    }
}
