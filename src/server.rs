//! # Server Configuration
//!
//! This module contains the server setup and configuration for the
//! Fundbridge API: shared state, routing, per-request trace context and the
//! OpenAPI document.

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::artifacts::ArtifactStore;
use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub artifacts: ArtifactStore,
}

/// Mints a trace id per request and makes it available both as a request
/// extension and through task-local storage for error responses.
async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let context = TraceContext {
        trace_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(context.clone());
    telemetry::with_trace_context(context, next.run(request)).await
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route(
            "/vendor/",
            get(handlers::accounts::vendor_auth_info).post(handlers::accounts::vendor_auth),
        )
        .route(
            "/investor/",
            get(handlers::accounts::investor_auth_info).post(handlers::accounts::investor_auth),
        )
        .route("/logout/", post(handlers::accounts::logout))
        .route("/dashboard/", get(handlers::dashboard::dashboard))
        .route("/vendor/verify/{id}/", get(handlers::vendors::verify_vendor))
        .route(
            "/vendor/invest/{short_id}/",
            get(handlers::vendors::invest_page).post(handlers::vendors::invest),
        )
        .route(
            "/my-investments/",
            get(handlers::investments::my_investments),
        )
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
    artifacts: ArtifactStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let state = AppState {
        config: Arc::new(config),
        db,
        artifacts,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds an [`AppState`] for handler tests
#[cfg(test)]
pub fn create_test_app_state(
    config: AppConfig,
    db: DatabaseConnection,
    artifacts_root: &std::path::Path,
) -> AppState {
    AppState {
        config: Arc::new(config),
        db,
        artifacts: ArtifactStore::new(artifacts_root),
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session token issued at login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::accounts::vendor_auth_info,
        crate::handlers::accounts::vendor_auth,
        crate::handlers::accounts::investor_auth_info,
        crate::handlers::accounts::investor_auth,
        crate::handlers::accounts::logout,
        crate::handlers::dashboard::dashboard,
        crate::handlers::vendors::verify_vendor,
        crate::handlers::vendors::invest_page,
        crate::handlers::vendors::invest,
        crate::handlers::investments::my_investments,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthStatus,
            crate::models::user::Role,
            crate::handlers::types::AccountSummary,
            crate::handlers::types::AuthResponse,
            crate::handlers::types::VendorProfileView,
            crate::handlers::types::DocumentView,
            crate::handlers::types::InvestmentView,
            crate::handlers::accounts::LoginCredentials,
            crate::handlers::accounts::DocumentPayload,
            crate::handlers::accounts::VendorSignupRequest,
            crate::handlers::accounts::InvestorSignupRequest,
            crate::handlers::accounts::VendorAuthRequest,
            crate::handlers::accounts::InvestorAuthRequest,
            crate::handlers::accounts::LogoutResponse,
            crate::handlers::accounts::AuthDescriptor,
            crate::handlers::dashboard::DashboardResponse,
            crate::handlers::vendors::VendorVerificationResponse,
            crate::handlers::vendors::InvestPageResponse,
            crate::handlers::vendors::InvestRequest,
            crate::handlers::investments::MyInvestmentsResponse,
            crate::error::ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Fundbridge API",
        description = "API connecting vendors seeking capital with investors",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
