//! Port for the external authentication service.
//!
//! The service never stores accounts or sessions; it forwards credentials,
//! verifies bearer tokens, and attaches the resulting identity to admin
//! writes. Token refresh and cookie management stay with the client and the
//! auth provider.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::AuthorIdentity;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or expired session token")]
    InvalidToken,
    #[error("auth backend error: {message}")]
    Backend { message: String },
    #[error("auth service unreachable: {0}")]
    Transport(String),
}

/// An issued session: the bearer token plus the identity it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub author: AuthorIdentity,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Resolve a bearer token to the author it authenticates.
    async fn verify(&self, access_token: &str) -> Result<AuthorIdentity, AuthError>;
}
