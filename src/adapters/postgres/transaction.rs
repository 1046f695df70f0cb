//! PostgreSQL transaction manager - the unit-of-work boundary.
//!
//! Each call to `in_transaction` begins a database transaction and hands
//! the work closure both the transaction and a fresh domain event buffer.
//! On commit the manager wakes the publish server and runs the commit-time
//! dispatch exactly once; on failure the transaction rolls back and the
//! buffer is discarded undispatched.

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::adapters::events::PublishSignal;
use crate::domain::events::{DomainEventBuffer, DomainEventDispatcher};
use crate::domain::foundation::DomainError;

/// Wraps units of work in a database transaction and triggers event
/// dispatch on successful completion.
pub struct PgTransactionManager {
    pool: PgPool,
    dispatcher: DomainEventDispatcher,
    signal: Arc<PublishSignal>,
}

impl PgTransactionManager {
    /// Creates a manager over the pool, dispatcher, and publish signal.
    pub fn new(
        pool: PgPool,
        dispatcher: DomainEventDispatcher,
        signal: Arc<PublishSignal>,
    ) -> Self {
        Self {
            pool,
            dispatcher,
            signal,
        }
    }

    /// Runs `work` inside a transaction.
    ///
    /// The closure receives the open transaction (for repository calls and
    /// `PgDomainEventStore::append_in_tx`) and the unit of work's event
    /// buffer. After commit, the publish signal is set and the buffered
    /// events are dispatched to the local handlers. A failing commit-time
    /// handler surfaces its error to the caller; the committed state is not
    /// undone.
    pub async fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: for<'t> FnOnce(
            &'t mut Transaction<'static, Postgres>,
            &'t DomainEventBuffer,
        ) -> BoxFuture<'t, Result<T, DomainError>>,
    {
        let mut tx = self.pool.begin().await?;
        let buffer = DomainEventBuffer::new();
        let out = work(&mut tx, &buffer).await?;
        tx.commit().await?;
        self.signal.set();
        self.dispatcher.dispatch(&buffer).await?;
        Ok(out)
    }
}
