use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/login", post(handlers::login))
        .route("/api/session/register", post(handlers::register))
        .route("/api/session/logout", post(handlers::logout))
        .route("/api/profile", put(handlers::update_profile))
        .route("/api/view/:view", post(handlers::navigate))
        .route(
            "/api/journal",
            get(handlers::get_journal).post(handlers::log_vitals),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/media", get(handlers::get_media).post(handlers::add_video))
        .route("/api/media/:id/playback", get(handlers::get_playback))
        .route(
            "/api/channel",
            get(handlers::get_channel).post(handlers::send_message),
        )
        .route("/api/coach", get(handlers::get_coach).post(handlers::ask_coach))
        .route("/api/coach/meal-plan", post(handlers::meal_plan))
        .route("/api/admin/accounts", get(handlers::admin_accounts))
        .route(
            "/api/admin/accounts/:id",
            put(handlers::admin_edit).delete(handlers::admin_delete),
        )
        .with_state(state)
}
