// src/services/repair_service.rs

use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeviceRepository, RepairRepository, UserRepository},
    middleware::tenancy::TenantScope,
    models::{
        device::DeviceStatus,
        repair::{CompleteRepairPayload, CreateRepairPayload, Repair, RepairPriority, RepairStatus},
    },
    services::device_service::apply_transition,
};

#[derive(Clone)]
pub struct RepairService {
    repair_repo: RepairRepository,
    device_repo: DeviceRepository,
    user_repo: UserRepository,
}

impl RepairService {
    pub fn new(
        repair_repo: RepairRepository,
        device_repo: DeviceRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            repair_repo,
            device_repo,
            user_repo,
        }
    }

    /// O designado precisa existir na MESMA empresa e ter papel de reparo.
    async fn validate_assignee(
        &self,
        conn: &mut PgConnection,
        scope: &TenantScope,
        assignee_id: Uuid,
    ) -> Result<(), AppError> {
        let assignee = self
            .user_repo
            .find_in_company(&mut *conn, scope.company_id, assignee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário designado".to_string()))?;

        if !assignee.role.can_be_assigned_repairs() {
            return Err(AppError::ValidationFailed(
                "O usuário designado não tem papel de reparo (REPAIR_MANAGER ou TECHNICIAN)."
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Criação: exige dispositivo em NEEDS_REPAIR e o move para IN_REPAIR na
    /// mesma transação do registro de reparo.
    pub async fn create_repair<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        payload: &CreateRepairPayload,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let device = self
            .device_repo
            .find_by_id_for_update(&mut *tx, payload.device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;
        scope.ensure_owns(device.company_id)?;

        // Pré-condição de negócio, distinta de aresta ilegal: reparo só em
        // dispositivo que precisa de reparo.
        if device.status != DeviceStatus::NeedsRepair {
            return Err(AppError::DeviceNotEligible(format!(
                "O dispositivo está em {:?}, e reparos exigem NEEDS_REPAIR.",
                device.status
            )));
        }

        if let Some(assignee_id) = payload.assigned_to {
            self.validate_assignee(&mut tx, scope, assignee_id).await?;
        }

        let repair = self
            .repair_repo
            .create_repair(
                &mut *tx,
                scope.company_id,
                payload.device_id,
                &payload.issue_description,
                payload.priority.unwrap_or(RepairPriority::Medium),
                payload.assigned_to,
            )
            .await?;

        apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::InRepair).await?;

        tx.commit().await?;
        Ok(repair)
    }

    pub async fn get_repair<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        repair_id: Uuid,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repair_repo
            .find_by_id(executor, scope.company_id, repair_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reparo".to_string()))
    }

    pub async fn list_repairs<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        status: Option<RepairStatus>,
    ) -> Result<Vec<Repair>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repair_repo.list(executor, scope.company_id, status).await
    }

    /// A posse do dispositivo é re-checada a cada mutação, nunca cacheada.
    async fn recheck_device_ownership(
        &self,
        conn: &mut PgConnection,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<(), AppError> {
        self.device_repo
            .find_by_id(&mut *conn, scope.company_id, device_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::Forbidden)
    }

    pub async fn assign_repair<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        repair_id: Uuid,
        assignee_id: Uuid,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let repair = self
            .repair_repo
            .find_by_id_for_update(&mut *tx, repair_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reparo".to_string()))?;
        scope.ensure_owns(repair.company_id)?;

        if repair.status.is_terminal() {
            return Err(AppError::ValidationFailed(
                "Reparo encerrado não pode ser reatribuído.".to_string(),
            ));
        }

        self.recheck_device_ownership(&mut tx, scope, repair.device_id).await?;
        self.validate_assignee(&mut tx, scope, assignee_id).await?;

        let updated = self
            .repair_repo
            .update_assignment(&mut *tx, scope.company_id, repair_id, assignee_id)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// PENDING -> IN_PROGRESS.
    pub async fn start_repair<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        repair_id: Uuid,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let repair = self
            .repair_repo
            .find_by_id_for_update(&mut *tx, repair_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reparo".to_string()))?;
        scope.ensure_owns(repair.company_id)?;

        if !repair.status.can_transition_to(RepairStatus::InProgress) {
            return Err(AppError::illegal_transition(repair.status, RepairStatus::InProgress));
        }

        self.recheck_device_ownership(&mut tx, scope, repair.device_id).await?;

        let updated = self
            .repair_repo
            .update_status_if_current(
                &mut *tx,
                scope.company_id,
                repair_id,
                repair.status,
                RepairStatus::InProgress,
            )
            .await?
            .ok_or(AppError::ConflictingTransition)?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Conclusão: exige nota, carimba completed_at e devolve o dispositivo
    /// ao funil — READY_FOR_SALE se a re-checagem passou, NEEDS_REPAIR se
    /// não. Registro e status numa única transação.
    pub async fn complete_repair<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        repair_id: Uuid,
        payload: &CompleteRepairPayload,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let repair = self
            .repair_repo
            .find_by_id_for_update(&mut *tx, repair_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reparo".to_string()))?;
        scope.ensure_owns(repair.company_id)?;

        if !repair.status.can_transition_to(RepairStatus::Completed) {
            return Err(AppError::illegal_transition(repair.status, RepairStatus::Completed));
        }

        // A posse do dispositivo é re-checada aqui, sob lock, não cacheada.
        let device = self
            .device_repo
            .find_by_id_for_update(&mut *tx, repair.device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;
        scope.ensure_owns(device.company_id)?;

        let target = if payload.recheck_passed {
            DeviceStatus::ReadyForSale
        } else {
            DeviceStatus::NeedsRepair
        };
        apply_transition(&self.device_repo, &mut *tx, &device, target).await?;

        let completed = self
            .repair_repo
            .complete_repair(&mut *tx, scope.company_id, repair_id, &payload.completion_notes)
            .await?
            .ok_or(AppError::ConflictingTransition)?;

        tx.commit().await?;
        Ok(completed)
    }

    /// Cancelamento de qualquer estado não-terminal; um reparo ativo devolve
    /// o dispositivo para NEEDS_REPAIR.
    pub async fn cancel_repair<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        repair_id: Uuid,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let repair = self
            .repair_repo
            .find_by_id_for_update(&mut *tx, repair_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reparo".to_string()))?;
        scope.ensure_owns(repair.company_id)?;

        if !repair.status.can_transition_to(RepairStatus::Cancelled) {
            return Err(AppError::illegal_transition(repair.status, RepairStatus::Cancelled));
        }

        let device = self
            .device_repo
            .find_by_id_for_update(&mut *tx, repair.device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;
        scope.ensure_owns(device.company_id)?;

        if device.status == DeviceStatus::InRepair {
            apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::NeedsRepair)
                .await?;
        }

        let cancelled = self
            .repair_repo
            .update_status_if_current(
                &mut *tx,
                scope.company_id,
                repair_id,
                repair.status,
                RepairStatus::Cancelled,
            )
            .await?
            .ok_or(AppError::ConflictingTransition)?;

        tx.commit().await?;
        Ok(cancelled)
    }
}
