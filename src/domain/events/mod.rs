//! Domain events - the event model and its in-process machinery.
//!
//! - `DomainEvent` / `DomainEventKind` / `EventId` - the event model
//! - `DomainEventBuffer` - per-transaction accumulation of emitted events
//! - `DomainEventHandlerRegistry` - kind-to-handlers mapping
//! - `DomainEventDispatcher` - commit-time fan-out to local handlers

mod buffer;
mod dispatcher;
mod model;
mod registry;

pub use buffer::{BufferSealedError, DomainEventBuffer};
pub use dispatcher::DomainEventDispatcher;
pub use model::{AuthorDeleted, DomainEvent, DomainEventKind, EventId, NewsArticlePublished};
pub use registry::{DomainEventHandler, DomainEventHandlerRegistry};
