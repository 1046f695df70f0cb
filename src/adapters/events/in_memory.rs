//! In-memory event infrastructure for tests and single-process deployments.
//!
//! Provides a `DomainEventStore` backed by a plain vector and a transaction
//! manager that runs the commit choreography without a database. Both mirror
//! the behavior of their PostgreSQL counterparts closely enough to drive the
//! full outbox pipeline in tests.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::{Arc, RwLock};

use crate::adapters::events::PublishSignal;
use crate::domain::events::{DomainEvent, DomainEventBuffer, DomainEventDispatcher, EventId};
use crate::domain::foundation::DomainError;
use crate::ports::DomainEventStore;

struct StoredRecord {
    event: DomainEvent,
    is_sent: bool,
}

/// In-memory implementation of the durable event store.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned. Acceptable for the
/// in-process use this adapter is meant for.
#[derive(Default)]
pub struct InMemoryDomainEventStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl InMemoryDomainEventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns how many events are still awaiting acknowledgement.
    pub fn unsent_count(&self) -> usize {
        self.records
            .read()
            .expect("InMemoryDomainEventStore: lock poisoned")
            .iter()
            .filter(|r| !r.is_sent)
            .count()
    }

    /// Whether the event with the given id has been acknowledged.
    pub fn is_sent(&self, event_id: &EventId) -> bool {
        self.records
            .read()
            .expect("InMemoryDomainEventStore: lock poisoned")
            .iter()
            .any(|r| r.event.event_id() == event_id && r.is_sent)
    }
}

#[async_trait]
impl DomainEventStore for InMemoryDomainEventStore {
    async fn append(&self, event: &DomainEvent) -> Result<(), DomainError> {
        self.records
            .write()
            .expect("InMemoryDomainEventStore: lock poisoned")
            .push(StoredRecord {
                event: event.clone(),
                is_sent: false,
            });
        Ok(())
    }

    async fn get_not_sent_events(&self, limit: usize) -> Result<Vec<DomainEvent>, DomainError> {
        let records = self
            .records
            .read()
            .expect("InMemoryDomainEventStore: lock poisoned");
        Ok(records
            .iter()
            .filter(|r| !r.is_sent)
            .take(limit)
            .map(|r| r.event.clone())
            .collect())
    }

    async fn ack_event_send(&self, event: &DomainEvent) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .expect("InMemoryDomainEventStore: lock poisoned");
        // unknown ids are a no-op: a concurrent publisher may have acked first
        for record in records.iter_mut() {
            if record.event.event_id() == event.event_id() {
                record.is_sent = true;
            }
        }
        Ok(())
    }
}

/// Transaction manager running the commit choreography without a database.
///
/// Each unit of work gets a fresh `DomainEventBuffer`; when the work closure
/// returns successfully, the manager wakes the publish server's signal and
/// runs the commit-time dispatch exactly once. A failing work closure
/// discards the buffer undispatched.
pub struct InMemoryTransactionManager {
    dispatcher: DomainEventDispatcher,
    signal: Arc<PublishSignal>,
}

impl InMemoryTransactionManager {
    /// Creates a manager over the given dispatcher and publish signal.
    pub fn new(dispatcher: DomainEventDispatcher, signal: Arc<PublishSignal>) -> Self {
        Self { dispatcher, signal }
    }

    /// Runs `work` as one unit of work.
    ///
    /// A failing commit-time handler surfaces its error to the caller, but
    /// the work itself has already completed by then.
    pub async fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: for<'a> FnOnce(&'a DomainEventBuffer) -> BoxFuture<'a, Result<T, DomainError>>,
    {
        let buffer = DomainEventBuffer::new();
        let out = work(&buffer).await?;
        self.signal.set();
        self.dispatcher.dispatch(&buffer).await?;
        Ok(out)
    }
}
