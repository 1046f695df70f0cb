//! Commit-time dispatch of buffered domain events.
//!
//! The dispatcher drains a sealed buffer when a unit of work commits and
//! runs every registered handler for each event. Handlers of one event run
//! concurrently; the dispatcher waits for all of them before moving on to
//! the next event, so commit does not return until every synchronous
//! handler has finished.

use futures::future::join_all;
use std::sync::Arc;

use super::buffer::DomainEventBuffer;
use super::registry::DomainEventHandlerRegistry;
use crate::domain::foundation::DomainError;

/// Drains a buffer and fans events out to the registered handlers.
pub struct DomainEventDispatcher {
    registry: Arc<DomainEventHandlerRegistry>,
}

impl DomainEventDispatcher {
    /// Creates a dispatcher over the shared handler registry.
    pub fn new(registry: Arc<DomainEventHandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Completes `buffer` and invokes all handlers for each drained event.
    ///
    /// A failing handler fails the whole dispatch: the first error is
    /// returned to the caller. The unit of work is already committed by the
    /// time dispatch runs, so the error surfaces to the caller without
    /// undoing the committed state.
    pub async fn dispatch(&self, buffer: &DomainEventBuffer) -> Result<(), DomainError> {
        let events = buffer.complete();
        for event in events {
            let handlers = self.registry.get_handlers(event.kind());
            if handlers.is_empty() {
                continue;
            }
            tracing::debug!(
                event_type = %event.kind(),
                event_id = %event.event_id(),
                handlers = handlers.len(),
                "dispatching domain event"
            );
            let results =
                join_all(handlers.iter().map(|handler| handler.handle(event.clone()))).await;
            for result in results {
                result?;
            }
        }
        Ok(())
    }
}
