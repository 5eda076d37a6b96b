// src/services/mod.rs

pub mod auth;
pub mod company_service;
pub mod dashboard_service;
pub mod device_service;
pub mod inspection_service;
pub mod repair_service;
pub mod sales_service;
pub mod shipment_service;
