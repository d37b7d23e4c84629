//! Per-session editing state machine.
//!
//! The machine is the view model for one open editor: it owns the transient
//! form, enforces the one-write-in-flight rule, and encodes the slug
//! derivation boundary — titles drive the slug only while the record is new.
//! It binds to no UI mechanism; callers feed it events and read it back.

use uuid::Uuid;

use crate::domain::entities::PostRecord;
use crate::domain::slug::derive_slug;

/// Where an edit session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPhase {
    /// Open, nothing touched yet.
    Idle,
    /// At least one field changed, or an existing record was loaded.
    Editing,
    /// Exactly one write is in flight; further submits are rejected and
    /// field mutations are ignored.
    Submitting,
    /// The write landed; the session is over and the caller navigates away.
    Succeeded,
}

/// The transient form. Discarded with the session; there is no draft
/// persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no edit in progress")]
    NotEditing,
    #[error("a submit is already in flight")]
    SubmitInFlight,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    phase: EditPhase,
    form: PostForm,
    record_id: Option<Uuid>,
    last_error: Option<String>,
}

impl EditSession {
    /// Start composing a new post.
    pub fn new_post() -> Self {
        Self {
            phase: EditPhase::Idle,
            form: PostForm::default(),
            record_id: None,
            last_error: None,
        }
    }

    /// Edit an existing record. The slug is now hand-editable only: title
    /// changes must not rewrite a published URL.
    pub fn for_record(record: &PostRecord) -> Self {
        Self {
            phase: EditPhase::Editing,
            form: PostForm {
                title: record.title.clone(),
                slug: record.slug.clone(),
                excerpt: record.excerpt.clone(),
                content: record.content.clone(),
                cover_image: record.cover_image.clone(),
                published: record.published,
            },
            record_id: Some(record.id),
            last_error: None,
        }
    }

    pub fn phase(&self) -> &EditPhase {
        &self.phase
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn record_id(&self) -> Option<Uuid> {
        self.record_id
    }

    /// The error message shown inline after a failed submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        if !self.begin_mutation() {
            return;
        }
        self.form.title = title.into();
        if self.record_id.is_none() {
            self.form.slug = derive_slug(&self.form.title);
        }
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        if self.begin_mutation() {
            self.form.slug = slug.into();
        }
    }

    pub fn set_excerpt(&mut self, excerpt: impl Into<String>) {
        if self.begin_mutation() {
            self.form.excerpt = excerpt.into();
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if self.begin_mutation() {
            self.form.content = content.into();
        }
    }

    pub fn set_cover_image(&mut self, url: Option<String>) {
        if self.begin_mutation() {
            self.form.cover_image = url.filter(|value| !value.is_empty());
        }
    }

    pub fn set_published(&mut self, published: bool) {
        if self.begin_mutation() {
            self.form.published = published;
        }
    }

    /// Move to `Submitting` and hand back the payload for the record store.
    pub fn begin_submit(&mut self) -> Result<super::SubmitPost, SessionError> {
        match self.phase {
            EditPhase::Editing => {
                self.phase = EditPhase::Submitting;
                self.last_error = None;
                Ok(super::SubmitPost {
                    record_id: self.record_id,
                    form: self.form.clone(),
                })
            }
            EditPhase::Submitting => Err(SessionError::SubmitInFlight),
            EditPhase::Idle | EditPhase::Succeeded => Err(SessionError::NotEditing),
        }
    }

    /// The in-flight write landed.
    pub fn complete(&mut self, record: &PostRecord) {
        if self.phase == EditPhase::Submitting {
            self.phase = EditPhase::Succeeded;
            self.record_id = Some(record.id);
        }
    }

    /// The in-flight write failed: back to editing, message shown inline.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.phase == EditPhase::Submitting {
            self.phase = EditPhase::Editing;
            self.last_error = Some(message.into());
        }
    }

    fn begin_mutation(&mut self) -> bool {
        match self.phase {
            EditPhase::Idle | EditPhase::Editing => {
                self.phase = EditPhase::Editing;
                self.last_error = None;
                true
            }
            EditPhase::Submitting | EditPhase::Succeeded => false,
        }
    }
}
