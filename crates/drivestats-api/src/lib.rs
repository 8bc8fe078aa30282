//! DriveStats API
//!
//! REST backend for tracking vehicles, their service statistics and
//! maintenance history, with account management, bug reports and a
//! newsletter signup.

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use drivestats_core::ServerConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for every route
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::auth::signup_handler,
        handlers::auth::signin_handler,
        handlers::auth::authenticate_handler,
        handlers::auth::signout_handler,
        handlers::accounts::get_user,
        handlers::accounts::check_user,
        handlers::accounts::check_email,
        handlers::accounts::update_password,
        handlers::vehicles::create_vehicle,
        handlers::vehicles::list_vehicles,
        handlers::vehicles::list_user_vehicles,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::vehicle_stats::create_stat,
        handlers::vehicle_stats::get_latest_stat,
        handlers::vehicle_stats::list_stats,
        handlers::vehicle_stats::update_stat,
        handlers::vehicle_stats::delete_stat,
        handlers::maintenance::create_log,
        handlers::maintenance::list_logs,
        handlers::maintenance::get_latest_log,
        handlers::maintenance::get_log,
        handlers::maintenance::update_log,
        handlers::maintenance::delete_log,
        handlers::bug_reports::create_report,
        handlers::bug_reports::list_reports,
        handlers::bug_reports::get_report,
        handlers::bug_reports::update_report,
        handlers::bug_reports::delete_report,
        handlers::newsletter::subscribe,
        handlers::newsletter::unsubscribe,
    ),
    components(schemas(
        error::ApiError,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        handlers::auth::SignInForm,
        handlers::auth::TokenResponse,
        handlers::auth::SessionResponse,
        handlers::auth::MessageResponse,
        handlers::accounts::CheckUserResponse,
        handlers::accounts::CheckEmailResponse,
        store::accounts::AccountOut,
        store::accounts::SignupRequest,
        store::accounts::UpdatePasswordRequest,
        store::Vehicle,
        store::VehicleIn,
        store::VehicleStat,
        store::VehicleStatIn,
        store::MaintenanceLog,
        store::MaintenanceLogIn,
        store::BugReport,
        store::BugReportIn,
        store::Subscriber,
        store::SubscriberIn,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "auth", description = "Signup, sign-in and sessions"),
        (name = "accounts", description = "Account lookup and password change"),
        (name = "vehicles", description = "Vehicles owned by the caller"),
        (name = "vehicle_stats", description = "Service mileage readings"),
        (name = "maintenance", description = "Maintenance logs"),
        (name = "bug_reports", description = "Bug reports"),
        (name = "newsletter", description = "Newsletter subscription"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// CORS for the configured browser origins
///
/// Cookies are sent cross-origin, so origins, methods and headers are listed
/// explicitly. With no origins configured no cross-origin request is allowed.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            // tower-http refuses a wildcard origin on a credentialed layer
            Ok(value) if value == "*" => {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
