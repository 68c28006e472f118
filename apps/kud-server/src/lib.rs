//! # KUD Rukun Tani Portal API
//!
//! JSON API behind the cooperative's admin portal and member portal.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Portal API Server                              │
//! │                                                                         │
//! │  Browser ───► axum Router ───► extractor (session gate) ───► handler   │
//! │                                                                 │       │
//! │                                   kud-core forms & rules ◄──────┤       │
//! │                                                                 ▼       │
//! │                                   kud-db repositories ───► SQLite      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{
    auth, dashboard, health, installments, loans, members, profile, reports, savings,
};
use crate::state::AppState;

/// All routes with tracing and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(member_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/session", get(auth::current_session))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/dashboard", get(dashboard::admin_dashboard))
        .route(
            "/api/admin/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/api/admin/members/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route(
            "/api/admin/members/{id}/savings",
            get(members::list_savings_entries).post(members::create_savings_entry),
        )
        .route(
            "/api/admin/members/{id}/savings/{entry_id}",
            put(members::update_savings_entry).delete(members::delete_savings_entry),
        )
        .route("/api/admin/loans", get(loans::list_applications))
        .route("/api/admin/loans/{id}/approve", post(loans::approve_application))
        .route("/api/admin/loans/{id}/reject", post(loans::reject_application))
        .route(
            "/api/admin/installments",
            get(installments::list_installments).post(installments::create_installment),
        )
        .route(
            "/api/admin/installments/{id}",
            put(installments::update_installment).delete(installments::delete_installment),
        )
        .route(
            "/api/admin/installments/{id}/toggle",
            post(installments::toggle_installment),
        )
        .route("/api/admin/savings", post(savings::record_deposit))
        .route("/api/admin/reports", get(reports::ledger_report))
        .route("/api/admin/reports/print", get(reports::print_report))
        .route(
            "/api/admin/profile",
            get(profile::admin_profile).put(profile::save_admin_profile),
        )
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/dashboard", get(dashboard::member_dashboard))
        .route(
            "/api/user/loans",
            get(loans::loan_status).post(loans::submit_application),
        )
        .route("/api/user/loans/quote", post(loans::quote))
        .route("/api/user/savings", get(savings::member_savings))
        .route(
            "/api/user/profile",
            get(profile::member_profile).put(profile::save_member_profile),
        )
}
