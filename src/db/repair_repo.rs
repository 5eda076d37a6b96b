// src/db/repair_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::repair::{Repair, RepairPriority, RepairStatus},
};

#[derive(Clone)]
pub struct RepairRepository {
    pool: PgPool,
}

impl RepairRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        repair_id: Uuid,
    ) -> Result<Option<Repair>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repair = sqlx::query_as::<_, Repair>(
            "SELECT * FROM repairs WHERE id = $1 AND company_id = $2",
        )
        .bind(repair_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(repair)
    }

    /// Lock de linha para mutações. Sem filtro de empresa: quem chama DEVE
    /// validar a posse com `TenantScope::ensure_owns` (escrita cross-tenant
    /// falha com Forbidden).
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        repair_id: Uuid,
    ) -> Result<Option<Repair>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repair =
            sqlx::query_as::<_, Repair>("SELECT * FROM repairs WHERE id = $1 FOR UPDATE")
                .bind(repair_id)
                .fetch_optional(executor)
                .await?;
        Ok(repair)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        status: Option<RepairStatus>,
    ) -> Result<Vec<Repair>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repairs = match status {
            Some(status) => {
                sqlx::query_as::<_, Repair>(
                    r#"
                    SELECT * FROM repairs
                    WHERE company_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(company_id)
                .bind(status)
                .fetch_all(executor)
                .await?
            }
            None => {
                sqlx::query_as::<_, Repair>(
                    "SELECT * FROM repairs WHERE company_id = $1 ORDER BY created_at DESC",
                )
                .bind(company_id)
                .fetch_all(executor)
                .await?
            }
        };
        Ok(repairs)
    }

    pub async fn create_repair<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        device_id: Uuid,
        issue_description: &str,
        priority: RepairPriority,
        assigned_to: Option<Uuid>,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            INSERT INTO repairs
                (company_id, device_id, issue_description, priority, assigned_to)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(device_id)
        .bind(issue_description)
        .bind(priority)
        .bind(assigned_to)
        .fetch_one(executor)
        .await?;
        Ok(repair)
    }

    pub async fn update_assignment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        repair_id: Uuid,
        assigned_to: Uuid,
    ) -> Result<Repair, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            UPDATE repairs
            SET assigned_to = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(repair_id)
        .bind(company_id)
        .bind(assigned_to)
        .fetch_one(executor)
        .await?;
        Ok(repair)
    }

    /// Mesma disciplina do dispositivo: o status só muda se ainda for o
    /// esperado. Zero linhas = corrida perdida.
    pub async fn update_status_if_current<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        repair_id: Uuid,
        expected: RepairStatus,
        target: RepairStatus,
    ) -> Result<Option<Repair>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            UPDATE repairs
            SET status = $4, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(repair_id)
        .bind(company_id)
        .bind(expected)
        .bind(target)
        .fetch_optional(executor)
        .await?;
        Ok(repair)
    }

    pub async fn complete_repair<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        repair_id: Uuid,
        completion_notes: &str,
    ) -> Result<Option<Repair>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            UPDATE repairs
            SET status = 'COMPLETED',
                completion_notes = $3,
                completed_at = now(),
                updated_at = now()
            WHERE id = $1 AND company_id = $2 AND status = 'IN_PROGRESS'
            RETURNING *
            "#,
        )
        .bind(repair_id)
        .bind(company_id)
        .bind(completion_notes)
        .fetch_optional(executor)
        .await?;
        Ok(repair)
    }
}
