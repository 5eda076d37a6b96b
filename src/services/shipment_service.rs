// src/services/shipment_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ShipmentRepository,
    middleware::tenancy::TenantScope,
    models::shipment::{
        CreateShipmentPayload, CreateVendorPayload, Shipment, ShipmentDetail, ShipmentSummary,
        Vendor,
    },
};

#[derive(Clone)]
pub struct ShipmentService {
    shipment_repo: ShipmentRepository,
}

impl ShipmentService {
    pub fn new(shipment_repo: ShipmentRepository) -> Self {
        Self { shipment_repo }
    }

    pub async fn create_vendor<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        payload: &CreateVendorPayload,
    ) -> Result<Vendor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.shipment_repo
            .create_vendor(
                executor,
                scope.company_id,
                &payload.name,
                payload.contact_phone.as_deref(),
            )
            .await
    }

    pub async fn list_vendors<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
    ) -> Result<Vec<Vendor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.shipment_repo.list_vendors(executor, scope.company_id).await
    }

    /// Cria o contêiner vazio da remessa. Os dispositivos chegam depois,
    /// apontando shipment_id na entrada.
    pub async fn create_shipment<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        payload: &CreateShipmentPayload,
    ) -> Result<Shipment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // O fornecedor precisa pertencer à empresa do ator.
        self.shipment_repo
            .find_vendor(&mut *tx, scope.company_id, payload.vendor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fornecedor".to_string()))?;

        let shipment = self
            .shipment_repo
            .create_shipment(
                &mut *tx,
                scope.company_id,
                payload.vendor_id,
                payload.delivery_date,
                payload.notes.as_deref(),
            )
            .await?;

        tx.commit().await?;
        Ok(shipment)
    }

    pub async fn list_shipments<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
    ) -> Result<Vec<ShipmentSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.shipment_repo.list_with_counts(executor, scope.company_id).await
    }

    /// Detalhe com os rollups derivados (contagem e quebra por status),
    /// lidos num snapshot transacional único.
    pub async fn get_shipment_detail<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        shipment_id: Uuid,
    ) -> Result<ShipmentDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let shipment = self
            .shipment_repo
            .find_shipment(&mut *tx, scope.company_id, shipment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remessa".to_string()))?;

        let device_count = self.shipment_repo.device_count(&mut *tx, shipment_id).await?;
        let status_breakdown = self.shipment_repo.status_breakdown(&mut *tx, shipment_id).await?;

        tx.commit().await?;

        Ok(ShipmentDetail {
            shipment,
            device_count,
            status_breakdown,
        })
    }
}
