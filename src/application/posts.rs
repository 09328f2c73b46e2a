//! Two-tier post storage resolution.
//!
//! Every operation is attempted against the primary store when one is
//! configured; any failure there is logged and the same operation is
//! retried once against the in-memory fallback, whose result is returned
//! as-is. There is no retry limit, no circuit breaker, and no consistency
//! between the tiers: a post created while the primary is down is
//! invisible once it recovers.

use std::sync::Arc;

use metrics::counter;
use tracing::warn;

use crate::application::repos::{
    CreateAck, DeleteAck, NewPost, PostPatch, PostsRepo, RepoError, UpdateAck,
};
use crate::domain::entities::PostRecord;

pub struct PostService {
    primary: Option<Arc<dyn PostsRepo>>,
    fallback: Arc<dyn PostsRepo>,
}

impl PostService {
    pub fn new(primary: Option<Arc<dyn PostsRepo>>, fallback: Arc<dyn PostsRepo>) -> Self {
        Self { primary, fallback }
    }

    /// Fallback-only service, used when no database URL is configured.
    pub fn fallback_only(fallback: Arc<dyn PostsRepo>) -> Self {
        Self::new(None, fallback)
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        match self.primary.as_deref() {
            Some(primary) => match primary.list_posts().await {
                Ok(posts) => Ok(posts),
                Err(err) => {
                    self.note_primary_failure("list", &err);
                    self.fallback.list_posts().await
                }
            },
            None => self.fallback.list_posts().await,
        }
    }

    pub async fn find_post(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        match self.primary.as_deref() {
            Some(primary) => match primary.find_post(id).await {
                Ok(post) => Ok(post),
                Err(err) => {
                    self.note_primary_failure("find", &err);
                    self.fallback.find_post(id).await
                }
            },
            None => self.fallback.find_post(id).await,
        }
    }

    pub async fn create_post(&self, post: NewPost) -> Result<CreateAck, RepoError> {
        match self.primary.as_deref() {
            Some(primary) => match primary.create_post(post.clone()).await {
                Ok(ack) => Ok(ack),
                Err(err) => {
                    self.note_primary_failure("create", &err);
                    self.fallback.create_post(post).await
                }
            },
            None => self.fallback.create_post(post).await,
        }
    }

    pub async fn update_post(&self, id: &str, patch: PostPatch) -> Result<UpdateAck, RepoError> {
        match self.primary.as_deref() {
            Some(primary) => match primary.update_post(id, patch.clone()).await {
                Ok(ack) => Ok(ack),
                Err(err) => {
                    self.note_primary_failure("update", &err);
                    self.fallback.update_post(id, patch).await
                }
            },
            None => self.fallback.update_post(id, patch).await,
        }
    }

    pub async fn delete_post(&self, id: &str) -> Result<DeleteAck, RepoError> {
        match self.primary.as_deref() {
            Some(primary) => match primary.delete_post(id).await {
                Ok(ack) => Ok(ack),
                Err(err) => {
                    self.note_primary_failure("delete", &err);
                    self.fallback.delete_post(id).await
                }
            },
            None => self.fallback.delete_post(id).await,
        }
    }

    fn note_primary_failure(&self, op: &'static str, err: &RepoError) {
        counter!("quaderno_store_primary_error_total", "op" => op).increment(1);
        counter!("quaderno_store_fallback_total", "op" => op).increment(1);
        warn!(
            target = "quaderno::store",
            op,
            error = %err,
            "primary store failed, serving from fallback",
        );
    }
}
