//! PostgreSQL implementation of the draft repository slice.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::DraftRepository;

/// PostgreSQL-backed `DraftRepository`.
pub struct PgDraftRepository {
    pool: PgPool,
}

impl PgDraftRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftRepository for PgDraftRepository {
    async fn delete_drafts_of_author(&self, author_id: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM drafts WHERE author_id = $1")
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
