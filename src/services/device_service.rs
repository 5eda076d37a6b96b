// src/services/device_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeviceRepository, ShipmentRepository},
    middleware::tenancy::TenantScope,
    models::device::{CreateDevicePayload, Device, DeviceStatus},
};

/// O ponto ÚNICO de aplicação de transição. Todos os fluxos que mudam o
/// status de um dispositivo (inspeção, reparo, venda, transferência,
/// sucateamento) passam por aqui:
///   1. legalidade pela tabela central (IllegalTransition);
///   2. UPDATE guardado pelo status esperado — zero linhas afetadas num
///      dispositivo vivo significa corrida perdida (ConflictingTransition).
/// Sempre chamado dentro da transação do registro que disparou a mudança,
/// para que status e registro sejam gravados como uma unidade.
pub(crate) async fn apply_transition<'e, E>(
    repo: &DeviceRepository,
    executor: E,
    device: &Device,
    target: DeviceStatus,
) -> Result<Device, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    if !device.status.can_transition_to(target) {
        return Err(AppError::illegal_transition(device.status, target));
    }

    match repo
        .update_status_if_current(executor, device.company_id, device.id, device.status, target)
        .await?
    {
        Some(updated) => Ok(updated),
        None => Err(AppError::ConflictingTransition),
    }
}

#[derive(Clone)]
pub struct DeviceService {
    device_repo: DeviceRepository,
    shipment_repo: ShipmentRepository,
}

impl DeviceService {
    pub fn new(device_repo: DeviceRepository, shipment_repo: ShipmentRepository) -> Self {
        Self {
            device_repo,
            shipment_repo,
        }
    }

    /// Entrada de dispositivo (via remessa ou manual). Nasce em RECEIVED.
    pub async fn create_device<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        payload: &CreateDevicePayload,
    ) -> Result<Device, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A remessa, se informada, precisa existir E pertencer à empresa do
        // ator. O vínculo acontece na mesma transação da criação, então o
        // device_count derivado nunca observa estado intermediário.
        if let Some(shipment_id) = payload.shipment_id {
            self.shipment_repo
                .find_shipment(&mut *tx, scope.company_id, shipment_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Remessa".to_string()))?;
        }

        let location = payload.current_location.as_deref().unwrap_or("warehouse");

        let device = self
            .device_repo
            .create_device(
                &mut *tx,
                scope.company_id,
                payload.shipment_id,
                &payload.asset_id,
                &payload.model,
                &payload.serial_number,
                &payload.manufacturer,
                payload.purchase_price,
                location,
            )
            .await?;

        tx.commit().await?;
        Ok(device)
    }

    pub async fn get_device<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<Device, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.device_repo
            .find_by_id(executor, scope.company_id, device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))
    }

    pub async fn list_devices<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        status: Option<DeviceStatus>,
    ) -> Result<Vec<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.device_repo.list(executor, scope.company_id, status).await
    }

    /// RECEIVED -> PENDING_INSPECTION (gatilho manual de fila).
    pub async fn queue_for_inspection<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<Device, AppError>
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

        let updated =
            apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::PendingInspection)
                .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// READY_FOR_SALE -> IN_BRANCH, atualizando a localização junto.
    pub async fn transfer_to_branch<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
        destination: &str,
    ) -> Result<Device, AppError>
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

        let updated =
            apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::InBranch).await?;

        self.device_repo
            .update_location(&mut *tx, scope.company_id, device_id, destination)
            .await?;

        tx.commit().await?;
        Ok(Device {
            current_location: destination.to_string(),
            ..updated
        })
    }

    /// IN_BRANCH -> READY_FOR_SALE (devolução ao armazém).
    pub async fn return_to_warehouse<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<Device, AppError>
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

        // Só faz sentido devolver o que está na filial.
        if device.status != DeviceStatus::InBranch {
            return Err(AppError::illegal_transition(device.status, DeviceStatus::ReadyForSale));
        }

        let updated =
            apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::ReadyForSale)
                .await?;

        self.device_repo
            .update_location(&mut *tx, scope.company_id, device_id, "warehouse")
            .await?;

        tx.commit().await?;
        Ok(Device {
            current_location: "warehouse".to_string(),
            ..updated
        })
    }

    /// Qualquer estado não-terminal -> SCRAP (condição irrecuperável).
    pub async fn scrap_device<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<Device, AppError>
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

        let updated =
            apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::Scrap).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Exclusão: física apenas pré-venda; vendido vira aposentadoria lógica.
    pub async fn delete_device<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        device_id: Uuid,
    ) -> Result<(), AppError>
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

        if device.status == DeviceStatus::Sold {
            self.device_repo
                .retire_device(&mut *tx, scope.company_id, device_id)
                .await?;
        } else {
            self.device_repo
                .delete_device(&mut *tx, scope.company_id, device_id)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
