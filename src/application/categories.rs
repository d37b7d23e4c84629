//! Category administration: the same create-vs-edit slug rule as posts,
//! with a two-field form.

use std::sync::Arc;

use metrics::counter;
use tracing::info;
use uuid::Uuid;

use crate::application::posts::WorkspaceError;
use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;
use crate::domain::slug::{derive_slug, is_canonical_slug};

/// One category submit: id present means update.
#[derive(Debug, Clone)]
pub struct SubmitCategory {
    pub record_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
}

#[derive(Clone)]
pub struct CategoryWorkspace {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
}

impl CategoryWorkspace {
    pub fn new(reader: Arc<dyn CategoriesRepo>, writer: Arc<dyn CategoriesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn submit(
        &self,
        submission: SubmitCategory,
    ) -> Result<CategoryRecord, WorkspaceError> {
        let SubmitCategory {
            record_id,
            name,
            slug,
        } = submission;

        if name.trim().is_empty() {
            return Err(WorkspaceError::MissingField { field: "name" });
        }

        let slug = if record_id.is_none() && slug.trim().is_empty() {
            derive_slug(&name)
        } else {
            slug.trim().to_string()
        };
        if slug.is_empty() {
            return Err(WorkspaceError::MissingField { field: "slug" });
        }
        if !is_canonical_slug(&slug) {
            return Err(WorkspaceError::InvalidSlug);
        }

        let record = match record_id {
            None => self
                .writer
                .create(CreateCategoryParams {
                    name,
                    slug: slug.clone(),
                })
                .await,
            Some(id) => {
                self.writer
                    .update(
                        id,
                        UpdateCategoryParams {
                            name: Some(name),
                            slug: Some(slug.clone()),
                        },
                    )
                    .await
            }
        }
        .map_err(|err| match err {
            RepoError::Duplicate { .. } => WorkspaceError::DuplicateSlug { slug: slug.clone() },
            other => other.into(),
        })?;

        counter!("kalem_categories_written_total").increment(1);
        info!(category = %record.id, slug = %record.slug, "category saved");

        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), WorkspaceError> {
        self.writer.delete(id).await?;
        info!(category = %id, "category deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryRecord, WorkspaceError> {
        self.reader
            .get_by_id(id)
            .await?
            .ok_or(WorkspaceError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<CategoryRecord>, WorkspaceError> {
        Ok(self.reader.list().await?)
    }
}
