mod admin;
mod auth;
pub mod error;
mod public;
mod state;

pub use state::AppState;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use sqlx::Error as SqlxError;

/// Assemble the full application router: unauthenticated read and sign-in
/// surfaces, plus the bearer-gated admin scope.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(public::list_posts))
        .route("/posts/{slug}", get(public::get_post))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .nest("/admin", admin::router(state.clone()))
        .with_state(state)
}

pub fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "database health check failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
