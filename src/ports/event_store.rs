//! DomainEventStore port - durable outbox log of emitted events.
//!
//! This port implements the storage half of the transactional outbox
//! pattern: every emitted event is persisted next to the business mutation
//! that produced it, flagged unsent, and later acknowledged by the
//! background publisher once every channel accepted it.

use async_trait::async_trait;

use crate::domain::events::DomainEvent;
use crate::domain::foundation::DomainError;

/// Port for the durable, queryable log of domain events.
///
/// Implementations must ensure:
/// - `append` participates in the caller's transaction where the backend
///   supports one, so event recording and the business state change commit
///   atomically
/// - `get_not_sent_events` returns unsent events in a stable order
///   (insertion order) and an empty collection, never an error, when none
///   are pending
/// - `ack_event_send` is idempotent: acknowledging an already-acknowledged
///   or unknown event is a success no-op, so concurrent publishers can race
///   on the same event safely
#[async_trait]
pub trait DomainEventStore: Send + Sync {
    /// Durably persists the event with its sent flag unset.
    ///
    /// A storage failure here must propagate so the enclosing business
    /// transaction rolls back: an event that cannot be recorded must not be
    /// treated as emitted.
    async fn append(&self, event: &DomainEvent) -> Result<(), DomainError>;

    /// Returns up to `limit` events that have not been acknowledged yet.
    async fn get_not_sent_events(&self, limit: usize) -> Result<Vec<DomainEvent>, DomainError>;

    /// Marks the given event as sent.
    async fn ack_event_send(&self, event: &DomainEvent) -> Result<(), DomainError>;
}
