// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{common::error::AppError, models::dashboard::InvoiceFinanceRow};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca as linhas financeiras num snapshot consistente (uma transação
    /// só de leitura): uma linha por fatura FINALIZADA com o custo agregado
    /// dos dispositivos vinculados. A dobra aritmética fica no service.
    pub async fn finance_rows<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<(Vec<InvoiceFinanceRow>, Decimal), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Uma linha por fatura. LEFT JOIN: fatura sem dispositivo vinculado
        // rende custo NULL (contribui 0, não erro).
        let rows = sqlx::query_as::<_, InvoiceFinanceRow>(
            r#"
            SELECT i.total_amount,
                   i.amount_paid,
                   SUM(d.purchase_price) AS device_cost
            FROM invoices i
            LEFT JOIN invoice_items ii ON ii.invoice_id = i.id
            LEFT JOIN devices d ON d.id = ii.device_id
            WHERE i.company_id = $1
              AND i.status = 'FINALIZED'
            GROUP BY i.id, i.total_amount, i.amount_paid
            "#,
        )
        .bind(company_id)
        .fetch_all(&mut *tx)
        .await?;

        // Saldo devedor agregado dos clientes da empresa.
        let outstanding_row = sqlx::query(
            "SELECT COALESCE(SUM(balance), 0) AS total FROM clients WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;
        let total_outstanding: Decimal = outstanding_row.try_get("total")?;

        tx.commit().await?;

        Ok((rows, total_outstanding))
    }
}
