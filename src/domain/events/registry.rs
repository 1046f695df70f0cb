//! Handler registry - process-wide mapping from event kind to handlers.
//!
//! The registry is built mutably during application startup (no import-time
//! side effects) and shared read-only behind an `Arc` once the servers start.
//! Registration has set semantics: registering the same handler instance for
//! the same kind twice results in a single invocation per event.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{DomainEvent, DomainEventKind};
use crate::domain::foundation::DomainError;

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - events are delivered at-least-once and may repeat
/// - **Quick** - long operations should be queued for async processing
#[async_trait]
pub trait DomainEventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: DomainEvent) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Two `Arc<dyn DomainEventHandler>`s refer to the same handler instance.
fn same_handler(a: &Arc<dyn DomainEventHandler>, b: &Arc<dyn DomainEventHandler>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Process-wide mapping from event kind to a set of handlers.
#[derive(Default)]
pub struct DomainEventHandlerRegistry {
    handlers: HashMap<DomainEventKind, Vec<Arc<dyn DomainEventHandler>>>,
}

impl DomainEventHandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler to the set for `kind`.
    ///
    /// Registering the same handler instance twice for the same kind is a
    /// no-op.
    pub fn register(&mut self, kind: DomainEventKind, handler: Arc<dyn DomainEventHandler>) {
        let handlers = self.handlers.entry(kind).or_default();
        if !handlers.iter().any(|h| same_handler(h, &handler)) {
            handlers.push(handler);
        }
    }

    /// Registers `handler` for `kind` and hands it back unchanged.
    ///
    /// Lets startup wiring register and keep a handler in one expression.
    pub fn on(
        &mut self,
        kind: DomainEventKind,
        handler: Arc<dyn DomainEventHandler>,
    ) -> Arc<dyn DomainEventHandler> {
        self.register(kind, Arc::clone(&handler));
        handler
    }

    /// Unions every kind's handler set from `other` into `self`.
    ///
    /// Used to compose registries built by independent modules into one
    /// process-wide registry.
    pub fn extend(&mut self, other: &DomainEventHandlerRegistry) {
        for (kind, handlers) in &other.handlers {
            for handler in handlers {
                self.register(*kind, Arc::clone(handler));
            }
        }
    }

    /// Returns the handlers registered for `kind`.
    ///
    /// Unknown kinds yield an empty slice, never an error.
    pub fn get_handlers(&self, kind: DomainEventKind) -> &[Arc<dyn DomainEventHandler>] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
