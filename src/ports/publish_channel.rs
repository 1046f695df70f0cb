//! PublishChannel port - a sink for publishing a single event.
//!
//! The domain publishes events without knowing the transport; adapters
//! implement this port for concrete brokers.

use async_trait::async_trait;

use crate::domain::events::DomainEvent;
use crate::domain::foundation::DomainError;

/// Port for publishing one serialized event to one downstream sink.
///
/// Implementations must:
/// - serialize the event to its canonical JSON byte form before transmission
/// - on transport failure, invalidate any cached connection so the next call
///   re-establishes it, and return the error so the publisher leaves the
///   event unacknowledged for retry
#[async_trait]
pub trait PublishChannel: Send + Sync {
    /// Publishes a single event.
    async fn publish(&self, event: &DomainEvent) -> Result<(), DomainError>;
}
