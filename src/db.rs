// src/db.rs

mod company_repo;
mod dashboard_repo;
mod device_repo;
mod inspection_repo;
mod repair_repo;
mod sales_repo;
mod shipment_repo;
mod user_repo;

pub use company_repo::CompanyRepository;
pub use dashboard_repo::DashboardRepository;
pub use device_repo::DeviceRepository;
pub use inspection_repo::InspectionRepository;
pub use repair_repo::RepairRepository;
pub use sales_repo::SalesRepository;
pub use shipment_repo::ShipmentRepository;
pub use user_repo::UserRepository;
