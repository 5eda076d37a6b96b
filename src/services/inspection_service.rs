// src/services/inspection_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeviceRepository, InspectionRepository},
    middleware::tenancy::TenantScope,
    models::{
        device::DeviceStatus,
        inspection::{
            InspectionHistory, PhysicalInspection, RecordPhysicalPayload, RecordTechnicalPayload,
            TechVerdict, TechnicalInspection,
        },
    },
    services::device_service::apply_transition,
};

#[derive(Clone)]
pub struct InspectionService {
    inspection_repo: InspectionRepository,
    device_repo: DeviceRepository,
}

impl InspectionService {
    pub fn new(inspection_repo: InspectionRepository, device_repo: DeviceRepository) -> Self {
        Self {
            inspection_repo,
            device_repo,
        }
    }

    /// Grava a inspeção física e dispara a transição correspondente, como
    /// uma operação combinada (registro + status numa única transação).
    pub async fn record_physical<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
        payload: &RecordPhysicalPayload,
    ) -> Result<PhysicalInspection, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // FOR UPDATE serializa inspeções concorrentes sobre o mesmo aparelho.
        let mut device = self
            .device_repo
            .find_by_id_for_update(&mut *tx, device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;
        scope.ensure_owns(device.company_id)?;

        // A inspeção física só cabe no início do funil. Sem esta checagem
        // explícita, arestas legais de OUTROS fluxos (ex: IN_REPAIR ->
        // NEEDS_REPAIR) seriam alcançáveis por aqui.
        if !matches!(
            device.status,
            DeviceStatus::PendingInspection | DeviceStatus::InPhysicalInspection
        ) {
            return Err(AppError::illegal_transition(
                device.status,
                DeviceStatus::InPhysicalInspection,
            ));
        }

        // Aparelho ainda na fila: avança para "em inspeção física" primeiro.
        if device.status == DeviceStatus::PendingInspection {
            device = apply_transition(
                &self.device_repo,
                &mut *tx,
                &device,
                DeviceStatus::InPhysicalInspection,
            )
            .await?;
        }

        let record = self
            .inspection_repo
            .insert_physical(&mut *tx, scope.company_id, device_id, scope.user_id, payload)
            .await?;

        // Aprovado segue para a bancada técnica; reprovado vai para reparo.
        let target = if payload.passed {
            DeviceStatus::InTechnicalInspection
        } else {
            DeviceStatus::NeedsRepair
        };
        apply_transition(&self.device_repo, &mut *tx, &device, target).await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Grava a inspeção técnica; o veredito decide entre READY_FOR_SALE e
    /// NEEDS_REPAIR.
    pub async fn record_technical<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
        payload: &RecordTechnicalPayload,
    ) -> Result<TechnicalInspection, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let device = self
            .device_repo
            .find_by_id_for_update(&mut *tx, device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;
        scope.ensure_owns(device.company_id)?;

        let target = match payload.verdict {
            TechVerdict::Ready => DeviceStatus::ReadyForSale,
            TechVerdict::NeedsRepair => DeviceStatus::NeedsRepair,
        };

        // A inspeção técnica exige a etapa técnica do funil — ver nota na
        // inspeção física.
        if device.status != DeviceStatus::InTechnicalInspection {
            return Err(AppError::illegal_transition(device.status, target));
        }

        let record = self
            .inspection_repo
            .insert_technical(&mut *tx, scope.company_id, device_id, scope.user_id, payload)
            .await?;

        apply_transition(&self.device_repo, &mut *tx, &device, target).await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Histórico completo (físicas + técnicas), ordenado por criação.
    pub async fn history<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<InspectionHistory, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // O dispositivo precisa existir na empresa do ator.
        self.device_repo
            .find_by_id(&mut *tx, scope.company_id, device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;

        let physical = self
            .inspection_repo
            .list_physical_for_device(&mut *tx, scope.company_id, device_id)
            .await?;
        let technical = self
            .inspection_repo
            .list_technical_for_device(&mut *tx, scope.company_id, device_id)
            .await?;

        tx.commit().await?;
        Ok(InspectionHistory { physical, technical })
    }
}
