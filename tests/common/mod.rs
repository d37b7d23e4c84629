//! In-memory collaborators for driving the router without external services.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use http_body_util::BodyExt;
use kalem::application::auth::{AuthError, AuthProvider, AuthSession};
use kalem::application::categories::CategoryWorkspace;
use kalem::application::pagination::{Page, PageRequest};
use kalem::application::posts::PostWorkspace;
use kalem::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, CreatePostParams, PostQueryFilter,
    PostsRepo, PostsWriteRepo, RepoError, UpdateCategoryParams, UpdatePostParams,
};
use kalem::application::uploads::{MediaUploadService, ObjectStorage, StorageError};
use kalem::domain::entities::{AuthorIdentity, CategoryRecord, PostRecord};
use kalem::infra::http::{AppState, build_router};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-session-token";
pub const TEST_EMAIL: &str = "yazar@example.com";
pub const TEST_PASSWORD: &str = "gizli-parola";

pub fn test_author() -> AuthorIdentity {
    AuthorIdentity {
        id: Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888),
        email: TEST_EMAIL.to_string(),
    }
}

/// Vec-backed record store enforcing the slug uniqueness constraint.
#[derive(Default)]
pub struct InMemoryStore {
    posts: Mutex<Vec<PostRecord>>,
    categories: Mutex<Vec<CategoryRecord>>,
    clock: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_timestamp(&self) -> OffsetDateTime {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(tick)
    }

    /// Insert a post directly, bypassing workflow validation.
    pub fn insert_post(
        &self,
        title: &str,
        slug: &str,
        published: bool,
        author_id: Uuid,
    ) -> PostRecord {
        let now = self.next_timestamp();
        let record = PostRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: format!("{title} özeti"),
            content: format!("# {title}\n\nSome **bold** text."),
            cover_image: None,
            published,
            author_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(record.clone());
        record
    }

    pub fn post_by_id(&self, id: Uuid) -> Option<PostRecord> {
        self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

fn matches_filter(post: &PostRecord, filter: &PostQueryFilter) -> bool {
    if let Some(author) = filter.author {
        if post.author_id != author {
            return false;
        }
    }
    if let Some(published) = filter.published {
        if post.published != published {
            return false;
        }
    }
    if let Some(needle) = &filter.title_contains {
        if !post
            .title
            .to_lowercase()
            .contains(&needle.to_lowercase())
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl PostsRepo for InMemoryStore {
    async fn list(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        let mut matched: Vec<PostRecord> = posts
            .iter()
            .filter(|post| matches_filter(post, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(items, total, page))
    }

    async fn get_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .iter()
            .find(|post| post.slug == slug && (!published_only || post.published))
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryStore {
    async fn create(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let now = self.next_timestamp();
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }

        let record = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            excerpt: params.excerpt,
            content: params.content,
            cover_image: params.cover_image,
            published: params.published,
            author_id: params.author_id,
            created_at: now,
            updated_at: now,
        };
        posts.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let now = self.next_timestamp();
        let mut posts = self.posts.lock().unwrap();

        if let Some(slug) = &params.slug {
            if posts.iter().any(|post| post.slug == *slug && post.id != id) {
                return Err(RepoError::Duplicate {
                    constraint: "posts_slug_key".to_string(),
                });
            }
        }

        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;

        if let Some(title) = params.title {
            post.title = title;
        }
        if let Some(slug) = params.slug {
            post.slug = slug;
        }
        if let Some(excerpt) = params.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = params.content {
            post.content = content;
        }
        if let Some(cover_image) = params.cover_image {
            post.cover_image = cover_image;
        }
        if let Some(published) = params.published {
            post.published = published;
        }
        post.updated_at = now;

        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoriesRepo for InMemoryStore {
    async fn list(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.slug == slug).cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for InMemoryStore {
    async fn create(&self, params: CreateCategoryParams) -> Result<CategoryRecord, RepoError> {
        let now = self.next_timestamp();
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".to_string(),
            });
        }

        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            created_at: now,
        };
        categories.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().unwrap();

        if let Some(slug) = &params.slug {
            if categories.iter().any(|c| c.slug == *slug && c.id != id) {
                return Err(RepoError::Duplicate {
                    constraint: "categories_slug_key".to_string(),
                });
            }
        }

        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;

        if let Some(name) = params.name {
            category.name = name;
        }
        if let Some(slug) = params.slug {
            category.slug = slug;
        }

        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Storage double that records every put instead of talking to a bucket.
#[derive(Default)]
pub struct RecordingStorage {
    puts: Mutex<Vec<(String, String, usize)>>,
}

impl RecordingStorage {
    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    pub fn last_path(&self) -> Option<String> {
        self.puts.lock().unwrap().last().map(|(path, _, _)| path.clone())
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put(&self, path: &str, content_type: &str, bytes: Bytes) -> Result<(), StorageError> {
        self.puts
            .lock()
            .unwrap()
            .push((path.to_string(), content_type.to_string(), bytes.len()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/images/{path}")
    }
}

/// Auth double accepting one fixed token and one fixed credential pair.
pub struct StaticAuth {
    author: AuthorIdentity,
}

impl StaticAuth {
    pub fn new(author: AuthorIdentity) -> Self {
        Self { author }
    }

    fn session(&self) -> AuthSession {
        AuthSession {
            access_token: TEST_TOKEN.to_string(),
            author: self.author.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn sign_up(&self, _email: &str, _password: &str) -> Result<AuthSession, AuthError> {
        Ok(self.session())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if email == TEST_EMAIL && password == TEST_PASSWORD {
            Ok(self.session())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn verify(&self, access_token: &str) -> Result<AuthorIdentity, AuthError> {
        if access_token == TEST_TOKEN {
            Ok(self.author.clone())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

pub struct TestContext {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub storage: Arc<RecordingStorage>,
}

pub fn context() -> TestContext {
    let store = Arc::new(InMemoryStore::new());
    let storage = Arc::new(RecordingStorage::default());

    let state = AppState {
        posts_reader: store.clone(),
        posts: Arc::new(PostWorkspace::new(store.clone(), store.clone())),
        categories: Arc::new(CategoryWorkspace::new(store.clone(), store.clone())),
        uploads: Arc::new(MediaUploadService::new(storage.clone())),
        auth: Arc::new(StaticAuth::new(test_author())),
    };

    TestContext {
        router: build_router(state),
        store,
        storage,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router never fails");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    send(router, request).await
}

pub async fn auth_get(router: &Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    send(router, request).await
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serializes")))
        .expect("request builds")
}

pub fn multipart_request(
    uri: &str,
    token: Option<&str>,
    filename: &str,
    content_type: &str,
    payload: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "kalem-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).expect("request builds")
}

pub fn delete_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}
