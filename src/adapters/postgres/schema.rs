//! Database schema for the event outbox and the draft slice it touches.

use sqlx::PgPool;

use crate::domain::foundation::DomainError;

/// SQL to create the domain events outbox table.
pub const CREATE_DOMAIN_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS domain_events (
    event_id       TEXT PRIMARY KEY,
    date_occurred  TIMESTAMPTZ NOT NULL,
    event_type     TEXT NOT NULL,
    body           JSONB NOT NULL,
    is_sent        BOOLEAN NOT NULL DEFAULT FALSE
);
";

/// Partial index so the publisher's unsent scan stays cheap as the log grows.
pub const CREATE_DOMAIN_EVENTS_UNSENT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_domain_events_unsent
    ON domain_events (date_occurred)
    WHERE is_sent = FALSE;
";

/// SQL to create the drafts table.
pub const CREATE_DRAFTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS drafts (
    draft_id   TEXT PRIMARY KEY,
    author_id  TEXT NOT NULL,
    headline   TEXT NOT NULL DEFAULT '',
    text       TEXT NOT NULL DEFAULT ''
);
";

pub const CREATE_DRAFTS_AUTHOR_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_drafts_author_id
    ON drafts (author_id);
";

/// Applies the schema, creating anything that does not exist yet.
pub async fn apply(pool: &PgPool) -> Result<(), DomainError> {
    for statement in [
        CREATE_DOMAIN_EVENTS_TABLE,
        CREATE_DOMAIN_EVENTS_UNSENT_INDEX,
        CREATE_DRAFTS_TABLE,
        CREATE_DRAFTS_AUTHOR_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
