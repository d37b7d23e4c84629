//! Admin post operations behind the edit session.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{
    CreatePostParams, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{AuthorIdentity, PostRecord};
use crate::domain::slug::{derive_slug, is_canonical_slug};

use super::PostForm;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("slug must contain only lowercase letters, digits, and single hyphens")]
    InvalidSlug,
    #[error("a record with slug `{slug}` already exists")]
    DuplicateSlug { slug: String },
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for WorkspaceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

/// One submit from an edit session: the form plus the record id when the
/// session was opened on an existing post.
#[derive(Debug, Clone)]
pub struct SubmitPost {
    pub record_id: Option<Uuid>,
    pub form: PostForm,
}

#[derive(Clone)]
pub struct PostWorkspace {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl PostWorkspace {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    /// Validate and persist one submission, dispatching create or update on
    /// the presence of a record id. The authenticated author becomes the
    /// record's author on create.
    pub async fn submit(
        &self,
        author: &AuthorIdentity,
        submission: SubmitPost,
    ) -> Result<PostRecord, WorkspaceError> {
        let SubmitPost { record_id, form } = submission;

        ensure_non_empty(&form.title, "title")?;
        ensure_non_empty(&form.excerpt, "excerpt")?;
        ensure_non_empty(&form.content, "content")?;

        // A fresh create may arrive without a slug (API clients that skip
        // the session); derive it from the title exactly as the session
        // would. Existing records never get a derived slug.
        let slug = if record_id.is_none() && form.slug.trim().is_empty() {
            derive_slug(&form.title)
        } else {
            form.slug.trim().to_string()
        };
        ensure_non_empty(&slug, "slug")?;
        if !is_canonical_slug(&slug) {
            return Err(WorkspaceError::InvalidSlug);
        }

        let record = match record_id {
            None => {
                let params = CreatePostParams {
                    title: form.title,
                    slug: slug.clone(),
                    excerpt: form.excerpt,
                    content: form.content,
                    cover_image: form.cover_image,
                    published: form.published,
                    author_id: author.id,
                };
                self.writer
                    .create(params)
                    .await
                    .map_err(|err| map_write_error(err, &slug))?
            }
            Some(id) => {
                let params = UpdatePostParams {
                    title: Some(form.title),
                    slug: Some(slug.clone()),
                    excerpt: Some(form.excerpt),
                    content: Some(form.content),
                    cover_image: Some(form.cover_image),
                    published: Some(form.published),
                };
                self.writer
                    .update(id, params)
                    .await
                    .map_err(|err| map_write_error(err, &slug))?
            }
        };

        let action = if record_id.is_none() {
            "create"
        } else {
            "update"
        };
        counter!("kalem_posts_written_total", "action" => action).increment(1);
        info!(
            post = %record.id,
            slug = %record.slug,
            published = record.published,
            action,
            "post saved"
        );

        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), WorkspaceError> {
        self.writer.delete(id).await?;
        counter!("kalem_posts_written_total", "action" => "delete").increment(1);
        info!(post = %id, "post deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<PostRecord, WorkspaceError> {
        self.reader
            .get_by_id(id)
            .await?
            .ok_or(WorkspaceError::NotFound)
    }

    /// Admin listing: the author's own posts, newest first.
    pub async fn list(
        &self,
        author: &AuthorIdentity,
        title_contains: Option<String>,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, WorkspaceError> {
        let filter = PostQueryFilter {
            author: Some(author.id),
            published: None,
            title_contains,
        };
        Ok(self.reader.list(&filter, page).await?)
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), WorkspaceError> {
    if value.trim().is_empty() {
        return Err(WorkspaceError::MissingField { field });
    }
    Ok(())
}

fn map_write_error(err: RepoError, slug: &str) -> WorkspaceError {
    match err {
        RepoError::Duplicate { .. } => WorkspaceError::DuplicateSlug {
            slug: slug.to_string(),
        },
        other => other.into(),
    }
}
