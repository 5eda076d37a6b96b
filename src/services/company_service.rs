// src/services/company_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompanyRepository,
    models::company::{Company, CreateCompanyPayload},
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(company_repo: CompanyRepository, pool: PgPool) -> Self {
        Self { company_repo, pool }
    }

    pub async fn create_company(&self, payload: &CreateCompanyPayload) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .create_company(&mut *tx, &payload.name, payload.tier(), payload.initial_status())
            .await?;

        tx.commit().await?;
        Ok(company)
    }

    pub async fn get_company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa".to_string()))
    }

    /// Listagem completa — apenas para o papel supra-tenant.
    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        self.company_repo.list_all().await
    }
}
