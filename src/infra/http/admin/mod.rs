//! Admin scope: every route below requires a verified bearer token.

mod categories;
mod posts;
mod uploads;

use axum::Router;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use crate::application::auth::AuthError;

use super::error::ApiError;
use super::state::AppState;

/// Multipart request ceiling. Generously above the 5 MiB file cap so the
/// validation error, not the transport, is what the editor sees.
const UPLOAD_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/preview", post(posts::preview_post))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/uploads",
            post(uploads::upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT_BYTES)),
        )
        .layer(middleware::from_fn_with_state(state, require_author))
}

/// Resolve the bearer token to an author identity, or reject with 401. The
/// identity rides on request extensions into the handlers.
async fn require_author(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = extract_bearer(request.headers().get(axum::http::header::AUTHORIZATION));

    let Some(token) = token else {
        return ApiError::unauthorized().into_response();
    };

    match state.auth.verify(&token).await {
        Ok(author) => {
            request.extensions_mut().insert(author);
            next.run(request).await
        }
        Err(AuthError::InvalidToken) => ApiError::unauthorized().into_response(),
        Err(other) => ApiError::from(other).into_response(),
    }
}

fn extract_bearer(header: Option<&axum::http::HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}
