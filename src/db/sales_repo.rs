// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{Client, Invoice, InvoiceItem, InvoicePayment, InvoiceStatus},
};

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Clientes
    // ---

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (company_id, name, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(phone)
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::ClientPhoneAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn find_client<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND company_id = $2",
        )
        .bind(client_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(clients)
    }

    /// Saldo do cliente: somado na finalização da fatura, subtraído no
    /// pagamento. Nenhum outro caminho mexe neste campo.
    pub async fn adjust_client_balance<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        client_id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE clients
            SET balance = balance + $3, updated_at = now()
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(client_id)
        .bind(company_id)
        .bind(delta)
        .execute(executor)
        .await?;
        Ok(())
    }

    // ---
    // Faturas
    // ---

    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        client_id: Uuid,
        total_amount: Decimal,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (company_id, client_id, total_amount)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(client_id)
        .bind(total_amount)
        .fetch_one(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn add_invoice_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        device_id: Uuid,
        unit_price: Decimal,
    ) -> Result<InvoiceItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InvoiceItem>(
            r#"
            INSERT INTO invoice_items (invoice_id, device_id, unit_price)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(device_id)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn find_invoice<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE id = $1 AND company_id = $2",
        )
        .bind(invoice_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }

    /// Lock de linha: o teto de pagamentos e a finalização dependem de
    /// leitura-e-escrita serializada sobre a fatura. Sem filtro de empresa:
    /// quem chama DEVE validar a posse com `TenantScope::ensure_owns`.
    pub async fn find_invoice_for_update<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice =
            sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 FOR UPDATE")
                .bind(invoice_id)
                .fetch_optional(executor)
                .await?;
        Ok(invoice)
    }

    pub async fn list_invoices<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(invoices)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT * FROM invoice_items WHERE invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Vec<InvoicePayment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, InvoicePayment>(
            "SELECT * FROM invoice_payments WHERE invoice_id = $1 ORDER BY created_at ASC",
        )
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(payments)
    }

    pub async fn set_invoice_status<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(company_id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn add_payment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
        method: Option<&str>,
    ) -> Result<InvoicePayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, InvoicePayment>(
            r#"
            INSERT INTO invoice_payments (company_id, invoice_id, amount, method)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(invoice_id)
        .bind(amount)
        .bind(method)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    pub async fn bump_amount_paid<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET amount_paid = amount_paid + $3, updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(company_id)
        .bind(amount)
        .fetch_one(executor)
        .await?;
        Ok(invoice)
    }
}
