// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, tenant_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (apenas autenticação, sem escopo de tenant)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Onboarding e listagem de empresas: o SUPER_ADMIN ainda não tem escopo
    // aqui, então só auth_guard.
    let company_admin_routes = Router::new()
        .route(
            "/",
            post(handlers::companies::create_company).get(handlers::companies::list_companies),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_scoped_routes = Router::new()
        .route("/me", get(handlers::companies::get_my_company))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    // O coração do sistema: registro de dispositivos + máquina de estados.
    // As inspeções moram sob /devices/{id}/inspections porque toda inspeção
    // referencia exatamente um dispositivo.
    let device_routes = Router::new()
        .route(
            "/",
            post(handlers::devices::create_device).get(handlers::devices::list_devices),
        )
        .route(
            "/{id}",
            get(handlers::devices::get_device).delete(handlers::devices::delete_device),
        )
        .route(
            "/{id}/queue-inspection",
            post(handlers::devices::queue_for_inspection),
        )
        .route("/{id}/transfer", post(handlers::devices::transfer_device))
        .route("/{id}/return", post(handlers::devices::return_device))
        .route("/{id}/scrap", post(handlers::devices::scrap_device))
        .route(
            "/{id}/inspections",
            get(handlers::inspections::inspection_history),
        )
        .route(
            "/{id}/inspections/physical",
            post(handlers::inspections::record_physical),
        )
        .route(
            "/{id}/inspections/technical",
            post(handlers::inspections::record_technical),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let repair_routes = Router::new()
        .route(
            "/",
            post(handlers::repairs::create_repair).get(handlers::repairs::list_repairs),
        )
        .route("/{id}", get(handlers::repairs::get_repair))
        .route("/{id}/assign", post(handlers::repairs::assign_repair))
        .route("/{id}/start", post(handlers::repairs::start_repair))
        .route("/{id}/complete", post(handlers::repairs::complete_repair))
        .route("/{id}/cancel", post(handlers::repairs::cancel_repair))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let vendor_routes = Router::new()
        .route(
            "/",
            post(handlers::shipments::create_vendor).get(handlers::shipments::list_vendors),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let shipment_routes = Router::new()
        .route(
            "/",
            post(handlers::shipments::create_shipment).get(handlers::shipments::list_shipments),
        )
        .route("/{id}", get(handlers::shipments::get_shipment))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::sales::create_client).get(handlers::sales::list_clients),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let invoice_routes = Router::new()
        .route(
            "/",
            post(handlers::sales::create_invoice).get(handlers::sales::list_invoices),
        )
        .route("/{id}", get(handlers::sales::get_invoice))
        .route("/{id}/finalize", post(handlers::sales::finalize_invoice))
        .route("/{id}/payments", post(handlers::sales::record_payment))
        .route("/{id}/cancel", post(handlers::sales::cancel_invoice))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/finance", get(handlers::dashboard::get_finance_dashboard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/companies", company_admin_routes.merge(company_scoped_routes))
        .nest("/api/devices", device_routes)
        .nest("/api/repairs", repair_routes)
        .nest("/api/vendors", vendor_routes)
        .nest("/api/shipments", shipment_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/invoices", invoice_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
