//! Per-transaction buffer of emitted domain events.
//!
//! A buffer is created fresh for each unit of work, collects the events the
//! domain logic emits, and is drained exactly once at commit time by the
//! dispatcher. Draining seals the buffer; appending to a sealed buffer is a
//! lifecycle bug in the calling service.

use std::sync::Mutex;
use thiserror::Error;

use super::model::DomainEvent;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Appending to a buffer that has already been completed.
#[derive(Debug, Error)]
#[error("domain event buffer is sealed, no further events can be appended")]
pub struct BufferSealedError;

impl From<BufferSealedError> for DomainError {
    fn from(err: BufferSealedError) -> Self {
        DomainError::new(ErrorCode::BufferSealed, err.to_string())
    }
}

#[derive(Default)]
struct BufferState {
    events: Vec<DomainEvent>,
    sealed: bool,
}

/// Single-use, order-preserving collection of events for one unit of work.
///
/// The buffer is owned by a single logical transaction; it uses a lock only
/// for interior mutability, not to support concurrent appends from multiple
/// units of work.
#[derive(Default)]
pub struct DomainEventBuffer {
    state: Mutex<BufferState>,
}

impl DomainEventBuffer {
    /// Creates an empty, open buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the tail of the buffer.
    pub fn append(&self, event: DomainEvent) -> Result<(), BufferSealedError> {
        let mut state = self.state.lock().expect("domain event buffer lock poisoned");
        if state.sealed {
            return Err(BufferSealedError);
        }
        state.events.push(event);
        Ok(())
    }

    /// Seals the buffer and returns every accumulated event in append order.
    ///
    /// Safe to call on an empty buffer; returns an empty sequence. A second
    /// call finds the buffer already drained and returns nothing.
    pub fn complete(&self) -> Vec<DomainEvent> {
        let mut state = self.state.lock().expect("domain event buffer lock poisoned");
        state.sealed = true;
        std::mem::take(&mut state.events)
    }

    /// Whether `complete` has been called.
    pub fn is_sealed(&self) -> bool {
        self.state
            .lock()
            .expect("domain event buffer lock poisoned")
            .sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_returns_events_in_append_order() {
        let buffer = DomainEventBuffer::new();
        let first = DomainEvent::author_deleted("a1");
        let second = DomainEvent::author_deleted("a2");
        buffer.append(first.clone()).unwrap();
        buffer.append(second.clone()).unwrap();

        let events = buffer.complete();

        assert_eq!(events, vec![first, second]);
    }

    #[test]
    fn append_after_complete_fails() {
        let buffer = DomainEventBuffer::new();
        buffer.complete();

        let result = buffer.append(DomainEvent::author_deleted("a1"));

        assert!(result.is_err());
        assert!(buffer.is_sealed());
    }

    #[test]
    fn complete_on_empty_buffer_returns_empty_sequence() {
        let buffer = DomainEventBuffer::new();
        assert!(buffer.complete().is_empty());
    }

    #[test]
    fn second_complete_returns_nothing() {
        let buffer = DomainEventBuffer::new();
        buffer.append(DomainEvent::author_deleted("a1")).unwrap();

        assert_eq!(buffer.complete().len(), 1);
        assert!(buffer.complete().is_empty());
    }

    #[test]
    fn sealed_error_converts_to_domain_error() {
        let err: DomainError = BufferSealedError.into();
        assert_eq!(err.code, ErrorCode::BufferSealed);
    }
}
