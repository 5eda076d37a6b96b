// src/db/shipment_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::shipment::{Shipment, ShipmentSummary, StatusCount, Vendor},
};

#[derive(Clone)]
pub struct ShipmentRepository {
    pool: PgPool,
}

impl ShipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Fornecedores
    // ---

    pub async fn create_vendor<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        contact_phone: Option<&str>,
    ) -> Result<Vendor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Vendor>(
            r#"
            INSERT INTO vendors (company_id, name, contact_phone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(contact_phone)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::VendorNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn find_vendor<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<Option<Vendor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vendor = sqlx::query_as::<_, Vendor>(
            "SELECT * FROM vendors WHERE id = $1 AND company_id = $2",
        )
        .bind(vendor_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(vendor)
    }

    pub async fn list_vendors<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<Vendor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vendors = sqlx::query_as::<_, Vendor>(
            "SELECT * FROM vendors WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(vendors)
    }

    // ---
    // Remessas
    // ---

    pub async fn create_shipment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        vendor_id: Uuid,
        delivery_date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Shipment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shipment = sqlx::query_as::<_, Shipment>(
            r#"
            INSERT INTO shipments (company_id, vendor_id, delivery_date, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(vendor_id)
        .bind(delivery_date)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(shipment)
    }

    pub async fn find_shipment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        shipment_id: Uuid,
    ) -> Result<Option<Shipment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shipment = sqlx::query_as::<_, Shipment>(
            "SELECT * FROM shipments WHERE id = $1 AND company_id = $2",
        )
        .bind(shipment_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(shipment)
    }

    /// Lista com device_count derivado no próprio SELECT — o valor nunca é
    /// armazenado, então nunca deriva.
    pub async fn list_with_counts<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<ShipmentSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query(
            r#"
            SELECT s.*,
                   (SELECT COUNT(*) FROM devices d WHERE d.shipment_id = s.id) AS device_count
            FROM shipments s
            WHERE s.company_id = $1
            ORDER BY s.delivery_date DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let shipment = Shipment {
                id: row.try_get("id")?,
                company_id: row.try_get("company_id")?,
                vendor_id: row.try_get("vendor_id")?,
                delivery_date: row.try_get("delivery_date")?,
                notes: row.try_get("notes")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            };
            let device_count: i64 = row.try_get("device_count")?;
            summaries.push(ShipmentSummary { shipment, device_count });
        }
        Ok(summaries)
    }

    pub async fn device_count<'e, E>(
        &self,
        executor: E,
        shipment_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM devices WHERE shipment_id = $1")
            .bind(shipment_id)
            .fetch_one(executor)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total)
    }

    pub async fn status_breakdown<'e, E>(
        &self,
        executor: E,
        shipment_id: Uuid,
    ) -> Result<Vec<StatusCount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let breakdown = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM devices
            WHERE shipment_id = $1
            GROUP BY status
            ORDER BY count DESC
            "#,
        )
        .bind(shipment_id)
        .fetch_all(executor)
        .await?;
        Ok(breakdown)
    }
}
