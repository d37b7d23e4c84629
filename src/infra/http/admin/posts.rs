//! Post CRUD and editor preview for the admin workspace.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest, page_window};
use crate::application::posts::{PostForm, SubmitPost};
use crate::application::render::render_preview;
use crate::domain::entities::{AuthorIdentity, PostRecord};

use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Listing plus the page-window bounds the admin table renders.
#[derive(Debug, Serialize)]
pub struct AdminPostList {
    pub items: Vec<PostRecord>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub window_start: u32,
    pub window_end: u32,
}

impl From<Page<PostRecord>> for AdminPostList {
    fn from(page: Page<PostRecord>) -> Self {
        let total_pages = page.total_pages();
        let (window_start, window_end) = page_window(page.page, total_pages);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
            window_start,
            window_end,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostPayload {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl PostPayload {
    fn into_form(self) -> PostForm {
        PostForm {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image.filter(|value| !value.is_empty()),
            published: self.published,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewPayload {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Extension(author): Extension<AuthorIdentity>,
    Query(query): Query<AdminListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    let search = query.search.filter(|value| !value.trim().is_empty());

    let page = state.posts.list(&author, search, request).await?;
    Ok(Json(AdminPostList::from(page)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.get(id).await?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(author): Extension<AuthorIdentity>,
    Json(payload): Json<PostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = SubmitPost {
        record_id: None,
        form: payload.into_form(),
    };
    let post = state.posts.submit(&author, submission).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(author): Extension<AuthorIdentity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = SubmitPost {
        record_id: Some(id),
        form: payload.into_form(),
    };
    let post = state.posts.submit(&author, submission).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.posts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Synchronous editor preview; never touches storage.
pub async fn preview_post(
    Json(payload): Json<PreviewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(PreviewResponse {
        html: render_preview(&payload.content),
    }))
}
