// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Companies ---
        handlers::companies::create_company,
        handlers::companies::list_companies,
        handlers::companies::get_my_company,

        // --- Devices ---
        handlers::devices::create_device,
        handlers::devices::list_devices,
        handlers::devices::get_device,
        handlers::devices::queue_for_inspection,
        handlers::devices::transfer_device,
        handlers::devices::return_device,
        handlers::devices::scrap_device,
        handlers::devices::delete_device,

        // --- Inspections ---
        handlers::inspections::record_physical,
        handlers::inspections::record_technical,
        handlers::inspections::inspection_history,

        // --- Repairs ---
        handlers::repairs::create_repair,
        handlers::repairs::list_repairs,
        handlers::repairs::get_repair,
        handlers::repairs::assign_repair,
        handlers::repairs::start_repair,
        handlers::repairs::complete_repair,
        handlers::repairs::cancel_repair,

        // --- Shipments ---
        handlers::shipments::create_vendor,
        handlers::shipments::list_vendors,
        handlers::shipments::create_shipment,
        handlers::shipments::list_shipments,
        handlers::shipments::get_shipment,

        // --- Sales ---
        handlers::sales::create_client,
        handlers::sales::list_clients,
        handlers::sales::create_invoice,
        handlers::sales::list_invoices,
        handlers::sales::get_invoice,
        handlers::sales::finalize_invoice,
        handlers::sales::record_payment,
        handlers::sales::cancel_invoice,

        // --- Dashboard ---
        handlers::dashboard::get_finance_dashboard,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::rbac::Role,

            // --- Companies ---
            models::company::Company,
            models::company::CompanyTier,
            models::company::CompanyStatus,
            models::company::CreateCompanyPayload,

            // --- Devices ---
            models::device::Device,
            models::device::DeviceStatus,
            models::device::CreateDevicePayload,
            models::device::TransferDevicePayload,

            // --- Inspections ---
            models::inspection::PhysicalInspection,
            models::inspection::TechnicalInspection,
            models::inspection::TechVerdict,
            models::inspection::RecordPhysicalPayload,
            models::inspection::RecordTechnicalPayload,
            models::inspection::InspectionHistory,

            // --- Repairs ---
            models::repair::Repair,
            models::repair::RepairStatus,
            models::repair::RepairPriority,
            models::repair::CreateRepairPayload,
            models::repair::AssignRepairPayload,
            models::repair::CompleteRepairPayload,

            // --- Shipments ---
            models::shipment::Vendor,
            models::shipment::Shipment,
            models::shipment::ShipmentSummary,
            models::shipment::ShipmentDetail,
            models::shipment::StatusCount,
            models::shipment::CreateVendorPayload,
            models::shipment::CreateShipmentPayload,

            // --- Sales ---
            models::sales::Client,
            models::sales::Invoice,
            models::sales::InvoiceStatus,
            models::sales::InvoiceItem,
            models::sales::InvoicePayment,
            models::sales::InvoiceDetail,
            models::sales::CreateClientPayload,
            models::sales::CreateInvoicePayload,
            models::sales::InvoiceItemPayload,
            models::sales::RecordPaymentPayload,

            // --- Dashboard ---
            models::dashboard::FinanceDashboard,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Companies", description = "Gestão de Empresas (Tenants)"),
        (name = "Devices", description = "Registro e Ciclo de Vida dos Dispositivos"),
        (name = "Inspections", description = "Inspeções Físicas e Técnicas (append-only)"),
        (name = "Repairs", description = "Fila e Fluxo de Reparos"),
        (name = "Shipments", description = "Fornecedores e Remessas de Entrada"),
        (name = "Sales", description = "Clientes, Faturas e Pagamentos"),
        (name = "Dashboard", description = "Indicadores Financeiros")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
