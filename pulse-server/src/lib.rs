//! pulse-server library - survey platform HTTP service
//!
//! Routes are grouped into an admin surface (survey/campaign authoring and
//! analytics, guarded by the admin-token middleware) and a public surface
//! (health, campaign rendering, response submission).

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod export;
pub mod submission;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared token for admin endpoints; empty disables the check
    pub admin_token: String,
}

impl AppState {
    pub fn new(db: SqlitePool, admin_token: String) -> Self {
        Self { db, admin_token }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, patch, post};

    // Admin routes (require X-Admin-Token when a token is configured)
    let admin = Router::new()
        .route("/api/surveys", post(api::surveys::create_survey))
        .route("/api/surveys", get(api::surveys::list_surveys))
        .route("/api/surveys/:id", get(api::surveys::get_survey))
        .route("/api/surveys/:id", patch(api::surveys::update_survey))
        .route("/api/surveys/:id", delete(api::surveys::delete_survey))
        .route("/api/surveys/:id/versions", post(api::surveys::create_version))
        .route("/api/surveys/:id/versions", get(api::surveys::list_versions))
        .route("/api/surveys/:id/versions/:version_id", get(api::surveys::get_version))
        .route("/api/templates", post(api::surveys::create_template))
        .route("/api/templates", get(api::surveys::list_templates))
        .route("/api/templates/:id", get(api::surveys::get_template))
        .route("/api/templates/:id/apply", post(api::surveys::apply_template))
        .route("/api/campaigns", post(api::campaigns::create_campaign))
        .route("/api/campaigns", get(api::campaigns::list_campaigns))
        .route("/api/campaigns/:id", patch(api::campaigns::update_campaign))
        .route("/api/campaigns/:id", delete(api::campaigns::delete_campaign))
        .route("/api/campaigns/:id/publish", post(api::campaigns::publish_campaign))
        .route("/api/campaigns/:id/close", post(api::campaigns::close_campaign))
        .route("/api/campaigns/:id/responses", get(api::responses::list_campaign_responses))
        .route("/api/responses/:id", get(api::responses::get_response))
        .route("/api/analytics/campaigns/:id", get(api::analytics::get_campaign_metrics))
        .route("/api/analytics/campaigns/:id/questions", get(api::analytics::get_questions_analytics))
        .route(
            "/api/analytics/campaigns/:id/questions/:question_id",
            get(api::analytics::get_question_analytics),
        )
        .route("/api/analytics/campaigns/:id/raw", get(api::analytics::get_raw_responses))
        .route("/api/analytics/campaigns/:id/export", get(api::analytics::export_campaign_csv))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::admin_middleware,
        ));

    // Public routes: health, campaign rendering, submission (respondent
    // identity is checked inside the submit handler)
    let public = Router::new()
        .route("/health", get(api::health::health))
        .route("/api/campaigns/:id", get(api::campaigns::get_campaign))
        .route("/api/responses/submit", post(api::responses::submit_response));

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
