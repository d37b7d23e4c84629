//! HTTP client for the hosted auth service.
//!
//! Only three calls are needed: password sign-up, password sign-in, and
//! bearer-token verification. Session refresh is the client's business.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::application::auth::{AuthError, AuthProvider, AuthSession};
use crate::domain::entities::AuthorIdentity;

pub struct HttpAuthProvider {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: String,
}

impl HttpAuthProvider {
    pub fn new(http: reqwest::Client, endpoint: Url, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    async fn password_grant(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(self.url(path))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "auth backend rejected request");
            return Err(AuthError::Backend { message });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        Ok(AuthSession {
            access_token: token.access_token,
            author: AuthorIdentity {
                id: token.user.id,
                email: token.user.email,
            },
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.password_grant("signup", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.password_grant("token?grant_type=password", email, password)
            .await
    }

    async fn verify(&self, access_token: &str) -> Result<AuthorIdentity, AuthError> {
        let response = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Backend { message });
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        Ok(AuthorIdentity {
            id: user.id,
            email: user.email,
        })
    }
}
