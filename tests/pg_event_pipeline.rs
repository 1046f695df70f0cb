//! Database-backed tests for the PostgreSQL event pipeline adapters.
//!
//! These tests need a running PostgreSQL instance and are ignored by
//! default. Point `NEWSROOM_TEST_DATABASE_URL` at a scratch database and
//! run them with `cargo test -- --ignored`.

use futures::FutureExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use newsroom::adapters::events::PublishSignal;
use newsroom::adapters::postgres::{
    schema, PgDomainEventStore, PgDraftRepository, PgTransactionManager,
};
use newsroom::application::events::build_handler_registry;
use newsroom::domain::events::{DomainEvent, DomainEventDispatcher};
use newsroom::ports::{DomainEventStore, DraftRepository};

async fn test_pool() -> PgPool {
    let url = std::env::var("NEWSROOM_TEST_DATABASE_URL")
        .expect("NEWSROOM_TEST_DATABASE_URL must point at a scratch database");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to the test database");
    schema::apply(&pool).await.expect("failed to apply schema");
    sqlx::query("TRUNCATE domain_events, drafts")
        .execute(&pool)
        .await
        .expect("failed to reset tables");
    pool
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn append_fetch_and_ack_round_trip() {
    let pool = test_pool().await;
    let store = PgDomainEventStore::new(pool);
    let event = DomainEvent::author_deleted("a1");

    store.append(&event).await.unwrap();
    let unsent = store.get_not_sent_events(50).await.unwrap();
    assert_eq!(unsent, vec![event.clone()]);

    store.ack_event_send(&event).await.unwrap();
    assert!(store.get_not_sent_events(50).await.unwrap().is_empty());

    // acking again is a no-op
    store.ack_event_send(&event).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn unsent_fetch_respects_the_limit() {
    let pool = test_pool().await;
    let store = PgDomainEventStore::new(pool);
    for i in 0..5 {
        store
            .append(&DomainEvent::author_deleted(format!("a{i}")))
            .await
            .unwrap();
    }

    assert_eq!(store.get_not_sent_events(2).await.unwrap().len(), 2);
    assert_eq!(store.get_not_sent_events(50).await.unwrap().len(), 5);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn commit_persists_outbox_row_and_runs_cascade() {
    let pool = test_pool().await;
    let store = Arc::new(PgDomainEventStore::new(pool.clone()));
    let drafts = Arc::new(PgDraftRepository::new(pool.clone()));
    let registry = Arc::new(build_handler_registry(drafts.clone()));
    let signal = Arc::new(PublishSignal::new());
    let manager = PgTransactionManager::new(
        pool.clone(),
        DomainEventDispatcher::new(registry),
        Arc::clone(&signal),
    );

    sqlx::query("INSERT INTO drafts (draft_id, author_id) VALUES ('d1', 'a1')")
        .execute(&pool)
        .await
        .unwrap();

    let store_in_tx = store.clone();
    manager
        .in_transaction(move |tx, buffer| {
            async move {
                let event = DomainEvent::author_deleted("a1");
                store_in_tx.append_in_tx(tx, &event).await?;
                buffer.append(event)?;
                Ok(())
            }
            .boxed()
        })
        .await
        .unwrap();

    // the outbox row committed with the transaction
    assert_eq!(store.get_not_sent_events(50).await.unwrap().len(), 1);
    assert!(signal.is_set());

    // the commit-time cascade removed the author's draft
    assert_eq!(drafts.delete_drafts_of_author("a1").await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn failed_work_rolls_back_the_outbox_row() {
    let pool = test_pool().await;
    let store = Arc::new(PgDomainEventStore::new(pool.clone()));
    let registry = Arc::new(build_handler_registry(Arc::new(PgDraftRepository::new(
        pool.clone(),
    ))));
    let signal = Arc::new(PublishSignal::new());
    let manager = PgTransactionManager::new(
        pool,
        DomainEventDispatcher::new(registry),
        Arc::clone(&signal),
    );

    let store_in_tx = store.clone();
    let result: Result<(), _> = manager
        .in_transaction(move |tx, buffer| {
            async move {
                let event = DomainEvent::author_deleted("a1");
                store_in_tx.append_in_tx(tx, &event).await?;
                buffer.append(event)?;
                Err(newsroom::domain::foundation::DomainError::storage(
                    "author removal failed",
                ))
            }
            .boxed()
        })
        .await;

    assert!(result.is_err());
    // the event never became visible: rolled back with the transaction
    assert!(store.get_not_sent_events(50).await.unwrap().is_empty());
    assert!(!signal.is_set());
}
