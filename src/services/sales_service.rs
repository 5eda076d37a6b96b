// src/services/sales_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeviceRepository, SalesRepository},
    middleware::tenancy::TenantScope,
    models::{
        device::DeviceStatus,
        sales::{
            Client, CreateClientPayload, CreateInvoicePayload, Invoice, InvoiceDetail,
            InvoicePayment, InvoiceStatus, RecordPaymentPayload, validate_payment,
        },
    },
    services::device_service::apply_transition,
};

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    device_repo: DeviceRepository,
}

impl SalesService {
    pub fn new(sales_repo: SalesRepository, device_repo: DeviceRepository) -> Self {
        Self {
            sales_repo,
            device_repo,
        }
    }

    // ---
    // Clientes
    // ---

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        payload: &CreateClientPayload,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo
            .create_client(
                executor,
                scope.company_id,
                &payload.name,
                &payload.phone,
                payload.email.as_deref(),
            )
            .await
    }

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo.list_clients(executor, scope.company_id).await
    }

    // ---
    // Faturas
    // ---

    /// Cria a fatura em DRAFT com seus itens. Valida posse do cliente e dos
    /// dispositivos e a elegibilidade de venda de cada um; o total é a soma
    /// exata dos preços dos itens.
    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        payload: &CreateInvoicePayload,
    ) -> Result<InvoiceDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.sales_repo
            .find_client(&mut *tx, scope.company_id, payload.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente".to_string()))?;

        // O mesmo aparelho não pode aparecer duas vezes na mesma fatura.
        let mut seen = std::collections::HashSet::new();
        for item in &payload.items {
            if !seen.insert(item.device_id) {
                return Err(AppError::ValidationFailed(
                    "Dispositivo repetido na fatura.".to_string(),
                ));
            }
        }

        let mut total_amount = Decimal::ZERO;
        for item in &payload.items {
            let device = self
                .device_repo
                .find_by_id(&mut *tx, scope.company_id, item.device_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;

            if !matches!(
                device.status,
                DeviceStatus::ReadyForSale | DeviceStatus::InBranch
            ) {
                return Err(AppError::DeviceNotEligible(format!(
                    "O dispositivo {} está em {:?} e não pode ser faturado.",
                    device.asset_id, device.status
                )));
            }

            if item.unit_price <= Decimal::ZERO {
                return Err(AppError::ValidationFailed(
                    "O preço unitário deve ser positivo.".to_string(),
                ));
            }

            total_amount += item.unit_price;
        }

        let invoice = self
            .sales_repo
            .create_invoice(&mut *tx, scope.company_id, payload.client_id, total_amount)
            .await?;

        let mut items = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            items.push(
                self.sales_repo
                    .add_invoice_item(&mut *tx, invoice.id, item.device_id, item.unit_price)
                    .await?,
            );
        }

        tx.commit().await?;
        Ok(InvoiceDetail {
            invoice,
            items,
            payments: Vec::new(),
        })
    }

    /// Finalização: cada dispositivo vai para SOLD (guardado por status — um
    /// aparelho vendido em outra fatura no meio-tempo derruba a operação com
    /// ConflictingTransition) e o saldo do cliente sobe pelo total. Tudo numa
    /// transação só: fatura, dispositivos e saldo nunca divergem.
    pub async fn finalize_invoice<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        invoice_id: Uuid,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let invoice = self
            .sales_repo
            .find_invoice_for_update(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fatura".to_string()))?;
        scope.ensure_owns(invoice.company_id)?;

        if invoice.status != InvoiceStatus::Draft {
            return Err(AppError::ValidationFailed(
                "Apenas faturas em DRAFT podem ser finalizadas.".to_string(),
            ));
        }

        let items = self.sales_repo.list_items(&mut *tx, invoice_id).await?;

        for item in &items {
            let device = self
                .device_repo
                .find_by_id_for_update(&mut *tx, item.device_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Dispositivo".to_string()))?;
            scope.ensure_owns(device.company_id)?;

            apply_transition(&self.device_repo, &mut *tx, &device, DeviceStatus::Sold).await?;
        }

        let finalized = self
            .sales_repo
            .set_invoice_status(&mut *tx, scope.company_id, invoice_id, InvoiceStatus::Finalized)
            .await?;

        self.sales_repo
            .adjust_client_balance(
                &mut *tx,
                scope.company_id,
                invoice.client_id,
                invoice.total_amount,
            )
            .await?;

        tx.commit().await?;
        Ok(finalized)
    }

    /// Pagamento parcial ou total. O teto (Σ pagamentos ≤ total) é checado
    /// sob FOR UPDATE, então duas quitações concorrentes não estouram o
    /// limite.
    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        invoice_id: Uuid,
        payload: &RecordPaymentPayload,
    ) -> Result<InvoicePayment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let invoice = self
            .sales_repo
            .find_invoice_for_update(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fatura".to_string()))?;
        scope.ensure_owns(invoice.company_id)?;

        if invoice.status != InvoiceStatus::Finalized {
            return Err(AppError::ValidationFailed(
                "Pagamentos só são aceitos em faturas finalizadas.".to_string(),
            ));
        }

        validate_payment(invoice.total_amount, invoice.amount_paid, payload.amount)?;

        let payment = self
            .sales_repo
            .add_payment(
                &mut *tx,
                scope.company_id,
                invoice_id,
                payload.amount,
                payload.method.as_deref(),
            )
            .await?;

        self.sales_repo
            .bump_amount_paid(&mut *tx, scope.company_id, invoice_id, payload.amount)
            .await?;

        // O pagamento abate a dívida em aberto do cliente.
        self.sales_repo
            .adjust_client_balance(&mut *tx, scope.company_id, invoice.client_id, -payload.amount)
            .await?;

        tx.commit().await?;
        Ok(payment)
    }

    /// Apenas rascunhos podem ser cancelados; fatura finalizada já moveu
    /// dispositivos e saldo.
    pub async fn cancel_invoice<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        invoice_id: Uuid,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let invoice = self
            .sales_repo
            .find_invoice_for_update(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fatura".to_string()))?;
        scope.ensure_owns(invoice.company_id)?;

        if invoice.status != InvoiceStatus::Draft {
            return Err(AppError::ValidationFailed(
                "Apenas faturas em DRAFT podem ser canceladas.".to_string(),
            ));
        }

        let cancelled = self
            .sales_repo
            .set_invoice_status(&mut *tx, scope.company_id, invoice_id, InvoiceStatus::Cancelled)
            .await?;

        tx.commit().await?;
        Ok(cancelled)
    }

    pub async fn list_invoices<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo.list_invoices(executor, scope.company_id).await
    }

    pub async fn get_invoice_detail<'e, E>(
        &self,
        executor: E,
        scope: &TenantScope,
        invoice_id: Uuid,
    ) -> Result<InvoiceDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let invoice = self
            .sales_repo
            .find_invoice(&mut *tx, scope.company_id, invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fatura".to_string()))?;

        let items = self.sales_repo.list_items(&mut *tx, invoice_id).await?;
        let payments = self.sales_repo.list_payments(&mut *tx, invoice_id).await?;

        tx.commit().await?;
        Ok(InvoiceDetail {
            invoice,
            items,
            payments,
        })
    }
}
