// src/handlers/mod.rs

pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod devices;
pub mod inspections;
pub mod repairs;
pub mod sales;
pub mod shipments;
