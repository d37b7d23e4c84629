use std::sync::Arc;

use crate::application::auth::AuthProvider;
use crate::application::categories::CategoryWorkspace;
use crate::application::posts::PostWorkspace;
use crate::application::repos::PostsRepo;
use crate::application::uploads::MediaUploadService;

#[derive(Clone)]
pub struct AppState {
    /// Read-only access for the public surface.
    pub posts_reader: Arc<dyn PostsRepo>,
    pub posts: Arc<PostWorkspace>,
    pub categories: Arc<CategoryWorkspace>,
    pub uploads: Arc<MediaUploadService>,
    pub auth: Arc<dyn AuthProvider>,
}
