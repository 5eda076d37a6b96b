// src/db/inspection_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inspection::{
        PhysicalInspection, RecordPhysicalPayload, RecordTechnicalPayload, TechnicalInspection,
    },
};

// Livro-razão de inspeções: apenas INSERT e SELECT. Não existe UPDATE aqui,
// de propósito — registros de inspeção são imutáveis.
#[derive(Clone)]
pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_physical<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
        inspector_id: Uuid,
        payload: &RecordPhysicalPayload,
    ) -> Result<PhysicalInspection, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, PhysicalInspection>(
            r#"
            INSERT INTO physical_inspections
                (company_id, device_id, inspector_id, chassis_condition,
                 screen_ok, keyboard_ok, ports_ok, passed, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(device_id)
        .bind(inspector_id)
        .bind(&payload.chassis_condition)
        .bind(payload.screen_ok)
        .bind(payload.keyboard_ok)
        .bind(payload.ports_ok)
        .bind(payload.passed)
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    pub async fn insert_technical<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
        inspector_id: Uuid,
        payload: &RecordTechnicalPayload,
    ) -> Result<TechnicalInspection, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TechnicalInspection>(
            r#"
            INSERT INTO technical_inspections
                (company_id, device_id, inspector_id, cpu_ok, ram_ok, disk_ok,
                 battery_health, boots, verdict, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(device_id)
        .bind(inspector_id)
        .bind(payload.cpu_ok)
        .bind(payload.ram_ok)
        .bind(payload.disk_ok)
        .bind(payload.battery_health)
        .bind(payload.boots)
        .bind(payload.verdict)
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    // Histórico ordenado por criação, para exibição.

    pub async fn list_physical_for_device<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
    ) -> Result<Vec<PhysicalInspection>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, PhysicalInspection>(
            r#"
            SELECT * FROM physical_inspections
            WHERE device_id = $1 AND company_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(device_id)
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(records)
    }

    pub async fn list_technical_for_device<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
    ) -> Result<Vec<TechnicalInspection>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, TechnicalInspection>(
            r#"
            SELECT * FROM technical_inspections
            WHERE device_id = $1 AND company_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(device_id)
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(records)
    }
}
