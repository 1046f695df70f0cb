//! PostgreSQL implementation of the domain event store.
//!
//! Events live in the `domain_events` table with their payload serialized
//! to a kind-specific JSON body. `append_in_tx` lets transaction boundaries
//! persist the outbox row atomically with the business mutation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::events::{
    AuthorDeleted, DomainEvent, DomainEventKind, EventId, NewsArticlePublished,
};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::DomainEventStore;

const INSERT_EVENT: &str = "\
    INSERT INTO domain_events (event_id, date_occurred, event_type, body, is_sent) \
    VALUES ($1, $2, $3, $4, FALSE)";

const SELECT_UNSENT: &str = "\
    SELECT event_id, date_occurred, event_type, body \
    FROM domain_events \
    WHERE is_sent = FALSE \
    ORDER BY date_occurred, event_id \
    LIMIT $1";

const MARK_SENT: &str = "UPDATE domain_events SET is_sent = TRUE WHERE event_id = $1";

/// Database row representation of a stored domain event.
#[derive(Debug, sqlx::FromRow)]
struct DomainEventRow {
    event_id: String,
    date_occurred: DateTime<Utc>,
    event_type: String,
    body: JsonValue,
}

fn body_json(event: &DomainEvent) -> JsonValue {
    match event {
        DomainEvent::AuthorDeleted(e) => json!({ "author_id": e.author_id }),
        DomainEvent::NewsArticlePublished(e) => json!({
            "news_article_id": e.news_article_id,
            "author_id": e.author_id,
        }),
    }
}

fn row_to_event(row: DomainEventRow) -> Result<DomainEvent, DomainError> {
    let kind = DomainEventKind::from_event_type(&row.event_type).ok_or_else(|| {
        DomainError::storage(format!("unknown stored event type: {}", row.event_type))
    })?;
    let event_id = EventId::from_string(row.event_id);
    let date_occurred = Timestamp::from_datetime(row.date_occurred);

    let malformed =
        |err: serde_json::Error| DomainError::storage(format!("malformed event body: {err}"));

    match kind {
        DomainEventKind::AuthorDeleted => {
            #[derive(Deserialize)]
            struct Body {
                author_id: String,
            }
            let body: Body = serde_json::from_value(row.body).map_err(malformed)?;
            Ok(DomainEvent::AuthorDeleted(AuthorDeleted {
                event_id,
                date_occurred,
                author_id: body.author_id,
            }))
        }
        DomainEventKind::NewsArticlePublished => {
            #[derive(Deserialize)]
            struct Body {
                news_article_id: String,
                author_id: String,
            }
            let body: Body = serde_json::from_value(row.body).map_err(malformed)?;
            Ok(DomainEvent::NewsArticlePublished(NewsArticlePublished {
                event_id,
                date_occurred,
                news_article_id: body.news_article_id,
                author_id: body.author_id,
            }))
        }
    }
}

/// PostgreSQL-backed `DomainEventStore`.
pub struct PgDomainEventStore {
    pool: PgPool,
}

impl PgDomainEventStore {
    /// Creates a store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists the event within an open transaction, so the outbox row
    /// commits or rolls back together with the business mutation.
    pub async fn append_in_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        event: &DomainEvent,
    ) -> Result<(), DomainError> {
        sqlx::query(INSERT_EVENT)
            .bind(event.event_id().as_str())
            .bind(*event.date_occurred().as_datetime())
            .bind(event.kind().as_str())
            .bind(body_json(event))
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DomainEventStore for PgDomainEventStore {
    async fn append(&self, event: &DomainEvent) -> Result<(), DomainError> {
        sqlx::query(INSERT_EVENT)
            .bind(event.event_id().as_str())
            .bind(*event.date_occurred().as_datetime())
            .bind(event.kind().as_str())
            .bind(body_json(event))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_not_sent_events(&self, limit: usize) -> Result<Vec<DomainEvent>, DomainError> {
        let rows: Vec<DomainEventRow> = sqlx::query_as(SELECT_UNSENT)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_event).collect()
    }

    async fn ack_event_send(&self, event: &DomainEvent) -> Result<(), DomainError> {
        // zero rows affected means another publisher got there first, or the
        // event is unknown; both are fine for the retry loop
        sqlx::query(MARK_SENT)
            .bind(event.event_id().as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
