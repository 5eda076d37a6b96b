// src/db/device_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::device::{Device, DeviceStatus},
};

#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---
    // Toda query carrega company_id no WHERE: o isolamento de tenant é a
    // disciplina primária de correção, antes de qualquer lock.

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
    ) -> Result<Option<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let device = sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE id = $1 AND company_id = $2",
        )
        .bind(device_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(device)
    }

    /// Variante com lock de linha, para operações de leitura-e-escrita.
    /// Serializa transições concorrentes sobre o mesmo dispositivo.
    /// Sem filtro de empresa: quem chama DEVE validar a posse com
    /// `TenantScope::ensure_owns` para que escrita cross-tenant falhe com
    /// Forbidden, não NotFound.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        device_id: Uuid,
    ) -> Result<Option<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let device =
            sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1 FOR UPDATE")
                .bind(device_id)
                .fetch_optional(executor)
                .await?;
        Ok(device)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        status: Option<DeviceStatus>,
    ) -> Result<Vec<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let devices = match status {
            Some(status) => {
                sqlx::query_as::<_, Device>(
                    r#"
                    SELECT * FROM devices
                    WHERE company_id = $1 AND status = $2 AND retired = FALSE
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(company_id)
                .bind(status)
                .fetch_all(executor)
                .await?
            }
            None => {
                sqlx::query_as::<_, Device>(
                    r#"
                    SELECT * FROM devices
                    WHERE company_id = $1 AND retired = FALSE
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(company_id)
                .fetch_all(executor)
                .await?
            }
        };
        Ok(devices)
    }

    // ---
    // Escrita
    // ---

    pub async fn create_device<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        shipment_id: Option<Uuid>,
        asset_id: &str,
        model: &str,
        serial_number: &str,
        manufacturer: &str,
        purchase_price: Decimal,
        current_location: &str,
    ) -> Result<Device, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices
                (company_id, shipment_id, asset_id, model, serial_number,
                 manufacturer, purchase_price, current_location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(shipment_id)
        .bind(asset_id)
        .bind(model)
        .bind(serial_number)
        .bind(manufacturer)
        .bind(purchase_price)
        .bind(current_location)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AssetIdAlreadyExists(asset_id.to_string());
                }
            }
            e.into()
        })
    }

    /// O coração do mecanismo de transição: atualiza o status SOMENTE se o
    /// status atual ainda for o esperado. Zero linhas afetadas significa que
    /// uma mutação concorrente venceu a corrida (ConflictingTransition no
    /// service) — nunca sobrescrevemos silenciosamente.
    pub async fn update_status_if_current<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
        expected: DeviceStatus,
        target: DeviceStatus,
    ) -> Result<Option<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let device = sqlx::query_as::<_, Device>(
            r#"
            UPDATE devices
            SET status = $4, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(device_id)
        .bind(company_id)
        .bind(expected)
        .bind(target)
        .fetch_optional(executor)
        .await?;
        Ok(device)
    }

    pub async fn update_location<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
        location: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE devices
            SET current_location = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(device_id)
        .bind(company_id)
        .bind(location)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Exclusão física — permitida apenas pré-venda (o service decide).
    pub async fn delete_device<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1 AND company_id = $2")
            .bind(device_id)
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Aposentadoria lógica de unidades vendidas.
    pub async fn retire_device<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE devices
            SET retired = TRUE, updated_at = now()
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(device_id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
