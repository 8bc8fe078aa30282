//! API route definitions

use crate::auth::session::{require_auth, session_middleware};
use crate::handlers::{
    accounts, auth, bug_reports, health, maintenance, newsletter, vehicle_stats, vehicles,
};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Build every API route
///
/// The session middleware runs on all routes so handlers that accept an
/// optional session (sign-out) can see it. Protected routes additionally sit
/// behind `require_auth`.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/signup", post(auth::signup_handler))
        .route("/auth/token", post(auth::signin_handler))
        .route("/auth/signout", delete(auth::signout_handler))
        .route(
            "/subscribe-email",
            post(newsletter::subscribe).delete(newsletter::unsubscribe),
        );

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/auth/authenticate", get(auth::authenticate_handler))
        // Accounts
        .route("/users/:username", get(accounts::get_user))
        .route("/check/users/:username", get(accounts::check_user))
        .route("/check/email/:email", get(accounts::check_email))
        .route("/account/update-password", put(accounts::update_password))
        // Vehicles
        .route(
            "/vehicles",
            post(vehicles::create_vehicle).get(vehicles::list_vehicles),
        )
        .route("/vehicles/user/:user_id", get(vehicles::list_user_vehicles))
        .route(
            "/vehicles/:vehicle_id",
            get(vehicles::get_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        // Vehicle stats
        .route(
            "/vehicle_stats/:vehicle_id",
            post(vehicle_stats::create_stat).get(vehicle_stats::get_latest_stat),
        )
        .route("/vehicle_stats/all/:vehicle_id", get(vehicle_stats::list_stats))
        .route(
            "/vehicle_stats/entry/:stat_id",
            put(vehicle_stats::update_stat).delete(vehicle_stats::delete_stat),
        )
        // Maintenance logs
        .route(
            "/vehicle-maintenance/create/:vehicle_id",
            post(maintenance::create_log),
        )
        .route(
            "/vehicle-maintenance/vehicle/:vehicle_id",
            get(maintenance::list_logs),
        )
        .route(
            "/vehicle-maintenance/latest/:vehicle_id",
            get(maintenance::get_latest_log),
        )
        .route(
            "/vehicle-maintenance/:log_id",
            get(maintenance::get_log)
                .put(maintenance::update_log)
                .delete(maintenance::delete_log),
        )
        // Bug reports
        .route(
            "/bug_report",
            post(bug_reports::create_report).get(bug_reports::list_reports),
        )
        .route(
            "/bug_report/:report_id",
            get(bug_reports::get_report)
                .put(bug_reports::update_report)
                .delete(bug_reports::delete_report),
        )
        .route_layer(middleware::from_fn(require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state, session_middleware))
}
