//! Unauthenticated read surface: published posts only.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::content::{excerpt_or_fallback, reading_time_minutes};
use crate::application::pagination::{Page, PageRequest};
use crate::application::render::render_published;
use crate::application::repos::PostQueryFilter;
use crate::domain::entities::PostRecord;

use super::error::ApiError;
use super::state::AppState;

const PUBLIC_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct PublicListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Listing card for the public feed.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub reading_time_minutes: u32,
}

impl From<PostRecord> for PostSummary {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: excerpt_or_fallback(&post.excerpt, &post.content),
            cover_image: post.cover_image,
            created_at: post.created_at,
            reading_time_minutes: reading_time_minutes(&post.content),
        }
    }
}

/// A published post rendered for display.
#[derive(Debug, Serialize)]
pub struct PublishedPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub content_html: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub reading_time_minutes: u32,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PublicListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(PUBLIC_PAGE_SIZE),
    );
    let filter = PostQueryFilter {
        title_contains: query.search.filter(|value| !value.trim().is_empty()),
        ..PostQueryFilter::published_only()
    };

    let page: Page<PostRecord> = state.posts_reader.list(&filter, request).await?;
    Ok(Json(page.map(PostSummary::from)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts_reader.get_by_slug(&slug, true).await?;

    let Some(post) = post else {
        return Err(ApiError::not_found("post not found"));
    };

    let content_html = render_published(&post.content)?;
    let reading_time = reading_time_minutes(&post.content);

    Ok(Json(PublishedPost {
        id: post.id,
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        cover_image: post.cover_image,
        content_html,
        created_at: post.created_at,
        updated_at: post.updated_at,
        reading_time_minutes: reading_time,
    }))
}
