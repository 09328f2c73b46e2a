//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Fields accepted when creating a post. Nothing is required; absent
/// fields land as empty strings. Validation lives in the UI form only.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Partial update with "set" semantics: only fields carrying a value
/// replace the stored ones.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAck {
    pub inserted_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpdateAck {
    pub modified: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeleteAck {
    pub deleted: u64,
}

/// The single collection of posts. Both the Postgres store and the
/// in-memory fallback implement this; the service layer picks between
/// them per call.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Full collection, in whatever order the backend keeps it.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    /// `None` when no record matches; an absent record is not an error.
    async fn find_post(&self, id: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn create_post(&self, post: NewPost) -> Result<CreateAck, RepoError>;

    /// Returns how many records changed; never materializes the record.
    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<UpdateAck, RepoError>;

    /// Idempotent: deleting an absent id yields `deleted: 0`.
    async fn delete_post(&self, id: &str) -> Result<DeleteAck, RepoError>;
}
