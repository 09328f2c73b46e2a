//! In-process fallback store.
//!
//! A plain ordered list behind a mutex. Contents are lost on restart and
//! never shared across instances; this tier exists so the application
//! keeps working when no database is configured or reachable.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::repos::{
    CreateAck, DeleteAck, NewPost, PostPatch, PostsRepo, RepoError, UpdateAck,
};
use crate::domain::entities::PostRecord;

pub struct MemoryPosts {
    posts: Mutex<Vec<PostRecord>>,
}

impl MemoryPosts {
    /// Empty store, mainly for tests.
    pub fn empty() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
        }
    }

    /// Store seeded with the two example posts every fresh deployment
    /// starts with.
    pub fn seeded() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            posts: Mutex::new(vec![
                PostRecord {
                    id: "1".to_string(),
                    title: "Welcome to the Blog!".to_string(),
                    content: "This is your first blog post. You can create, edit, and delete \
                              posts using the form above."
                        .to_string(),
                    created_at: Some(now),
                },
                PostRecord {
                    id: "2".to_string(),
                    title: "Getting Started".to_string(),
                    content: "To connect to a real database, set `database.url` in your \
                              configuration or the QUADERNO__DATABASE__URL environment variable."
                        .to_string(),
                    created_at: Some(now),
                },
            ]),
        }
    }
}

#[async_trait]
impl PostsRepo for MemoryPosts {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        Ok(self.posts.lock().await.clone())
    }

    async fn find_post(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<CreateAck, RepoError> {
        let record = PostRecord {
            id: Uuid::new_v4().to_string(),
            title: post.title,
            content: post.content,
            created_at: Some(OffsetDateTime::now_utc()),
        };
        let inserted_id = record.id.clone();
        self.posts.lock().await.push(record);
        Ok(CreateAck { inserted_id })
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<UpdateAck, RepoError> {
        if patch.is_empty() {
            return Ok(UpdateAck { modified: 0 });
        }
        let mut posts = self.posts.lock().await;
        match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                if let Some(title) = patch.title {
                    post.title = title;
                }
                if let Some(content) = patch.content {
                    post.content = content;
                }
                Ok(UpdateAck { modified: 1 })
            }
            None => Ok(UpdateAck { modified: 0 }),
        }
    }

    async fn delete_post(&self, id: &str) -> Result<DeleteAck, RepoError> {
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(DeleteAck {
            deleted: (before - posts.len()) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_store_lists_both_example_posts() {
        let store = MemoryPosts::seeded();
        let posts = store.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Welcome to the Blog!");
        assert_eq!(posts[1].title, "Getting Started");
    }

    #[tokio::test]
    async fn created_post_is_retrievable_by_its_ack_id() {
        let store = MemoryPosts::empty();
        let ack = store
            .create_post(NewPost {
                title: "Hello".into(),
                content: "World".into(),
            })
            .await
            .unwrap();
        assert!(!ack.inserted_id.is_empty());

        let post = store.find_post(&ack.inserted_id).await.unwrap().unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert!(post.created_at.is_some());
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_untouched() {
        let store = MemoryPosts::empty();
        let ack = store
            .create_post(NewPost {
                title: "Hello".into(),
                content: "World".into(),
            })
            .await
            .unwrap();

        let update = store
            .update_post(
                &ack.inserted_id,
                PostPatch {
                    title: Some("Hello v2".into()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(update.modified, 1);

        let post = store.find_post(&ack.inserted_id).await.unwrap().unwrap();
        assert_eq!(post.title, "Hello v2");
        assert_eq!(post.content, "World");
    }

    #[tokio::test]
    async fn empty_patch_modifies_nothing() {
        let store = MemoryPosts::seeded();
        let ack = store.update_post("1", PostPatch::default()).await.unwrap();
        assert_eq!(ack.modified, 0);
    }

    #[tokio::test]
    async fn deleting_missing_id_reports_zero() {
        let store = MemoryPosts::empty();
        let ack = store.delete_post("no-such-id").await.unwrap();
        assert_eq!(ack.deleted, 0);
    }

    #[tokio::test]
    async fn list_reflects_creates_minus_deletes() {
        let store = MemoryPosts::empty();
        let mut ids = Vec::new();
        for n in 0..4 {
            let ack = store
                .create_post(NewPost {
                    title: format!("post {n}"),
                    content: String::new(),
                })
                .await
                .unwrap();
            ids.push(ack.inserted_id);
        }
        store.delete_post(&ids[0]).await.unwrap();
        store.delete_post(&ids[2]).await.unwrap();

        let posts = store.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
    }
}
