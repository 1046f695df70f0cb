//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DomainEventStore` - durable outbox log with sent/unsent flags
//! - `PublishChannel` - single-event sink towards a message broker
//! - `DraftRepository` - draft persistence used by event handlers

mod draft_repository;
mod event_store;
mod publish_channel;

pub use draft_repository::DraftRepository;
pub use event_store::DomainEventStore;
pub use publish_channel::PublishChannel;
