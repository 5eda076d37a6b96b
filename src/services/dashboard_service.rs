// src/services/dashboard_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::FinanceDashboard,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// receita = Σ total das faturas finalizadas; custo = Σ preço de compra
    /// dos dispositivos vinculados (0 quando ausente); lucro = receita −
    /// custo; recebido = Σ pago; em aberto = Σ saldo dos clientes.
    /// A aritmética é uma dobra pura em Decimal sobre o snapshot do repo.
    pub async fn get_dashboard<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<FinanceDashboard, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let (rows, total_outstanding) = self.repo.finance_rows(executor, company_id).await?;
        Ok(FinanceDashboard::from_rows(&rows, total_outstanding))
    }
}
