//! Postgres-backed repository implementation.

mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
    query, query_as, query_scalar,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateAck, DeleteAck, NewPost, PostPatch, PostsRepo, RepoError, UpdateAck,
};
use crate::domain::entities::PostRecord;

#[derive(Clone)]
pub struct PostgresPosts {
    pool: Arc<PgPool>,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    created_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id.to_string(),
            title: row.title,
            content: row.content,
            created_at: Some(row.created_at),
        }
    }
}

impl PostgresPosts {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lazy pool: no connection is attempted until the first query, so a
    /// down database surfaces as per-call repo errors rather than a
    /// startup failure.
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    /// The primary store keys rows by UUID; any other identifier shape is
    /// an invalid-input repo error, which the service layer turns into a
    /// fallback lookup.
    fn parse_id(id: &str) -> Result<Uuid, RepoError> {
        Uuid::parse_str(id)
            .map_err(|err| RepoError::invalid_input(format!("malformed post id `{id}`: {err}")))
    }
}

#[async_trait]
impl PostsRepo for PostgresPosts {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows = query_as::<_, PostRow>(
            "SELECT id, title, content, created_at FROM posts ORDER BY created_at, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_post(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        let id = Self::parse_id(id)?;
        let row = query_as::<_, PostRow>(
            "SELECT id, title, content, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn create_post(&self, post: NewPost) -> Result<CreateAck, RepoError> {
        let id = query_scalar::<_, Uuid>(
            "INSERT INTO posts (title, content) VALUES ($1, $2) RETURNING id",
        )
        .bind(post.title)
        .bind(post.content)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CreateAck {
            inserted_id: id.to_string(),
        })
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<UpdateAck, RepoError> {
        let id = Self::parse_id(id)?;
        if patch.is_empty() {
            return Ok(UpdateAck { modified: 0 });
        }

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE posts SET ");
        let mut assignments = qb.separated(", ");
        if let Some(title) = patch.title {
            assignments.push("title = ");
            assignments.push_bind_unseparated(title);
        }
        if let Some(content) = patch.content {
            assignments.push("content = ");
            assignments.push_bind_unseparated(content);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb
            .build()
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(UpdateAck {
            modified: result.rows_affected(),
        })
    }

    async fn delete_post(&self, id: &str) -> Result<DeleteAck, RepoError> {
        let id = Self::parse_id(id)?;
        let result = query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(DeleteAck {
            deleted: result.rows_affected(),
        })
    }
}
