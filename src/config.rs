// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CompanyRepository, DashboardRepository, DeviceRepository, InspectionRepository,
        RepairRepository, SalesRepository, ShipmentRepository, UserRepository,
    },
    services::{
        auth::AuthService, company_service::CompanyService, dashboard_service::DashboardService,
        device_service::DeviceService, inspection_service::InspectionService,
        repair_service::RepairService, sales_service::SalesService,
        shipment_service::ShipmentService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub device_service: DeviceService,
    pub inspection_service: InspectionService,
    pub repair_service: RepairService,
    pub shipment_service: ShipmentService,
    pub sales_service: SalesService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros.
        // O acquire_timeout garante que nenhuma operação bloqueie para sempre
        // esperando conexão: vira falha tipada na borda de storage.
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        // Repositórios e serviços recebem tudo por injeção explícita;
        // nenhum handle global de processo.
        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let device_repo = DeviceRepository::new(db_pool.clone());
        let inspection_repo = InspectionRepository::new(db_pool.clone());
        let repair_repo = RepairRepository::new(db_pool.clone());
        let shipment_repo = ShipmentRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            company_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let company_service = CompanyService::new(company_repo.clone(), db_pool.clone());
        let device_service = DeviceService::new(device_repo.clone(), shipment_repo.clone());
        let inspection_service =
            InspectionService::new(inspection_repo.clone(), device_repo.clone());
        let repair_service =
            RepairService::new(repair_repo.clone(), device_repo.clone(), user_repo.clone());
        let shipment_service = ShipmentService::new(shipment_repo.clone());
        let sales_service = SalesService::new(sales_repo.clone(), device_repo.clone());
        let dashboard_service = DashboardService::new(dashboard_repo.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            company_service,
            device_service,
            inspection_service,
            repair_service,
            shipment_service,
            sales_service,
            dashboard_service,
        })
    }
}
