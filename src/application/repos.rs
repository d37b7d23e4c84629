//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::domain::entities::{CategoryRecord, PostRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Typed query options for post listings. Every filter is optional; the
/// repository composes them with `AND`.
#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    pub author: Option<Uuid>,
    pub published: Option<bool>,
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
}

impl PostQueryFilter {
    pub fn published_only() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
}

/// Partial update: `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostParams {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<Option<String>>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryParams {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// List posts ordered by creation time descending.
    async fn list(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError>;

    async fn get_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<PostRecord>, RepoError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Returns [`RepoError::NotFound`] when no record carries `id`.
    async fn update(&self, id: Uuid, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// All categories, ordered by name.
    async fn list(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create(&self, params: CreateCategoryParams) -> Result<CategoryRecord, RepoError>;

    async fn update(
        &self,
        id: Uuid,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
