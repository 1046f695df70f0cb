//! PostgreSQL adapters.
//!
//! - `PgDomainEventStore` - outbox table implementation of the event store
//! - `PgDraftRepository` - draft slice used by the cascade handler
//! - `PgTransactionManager` - unit-of-work boundary with commit dispatch
//! - `schema` - DDL for the tables this crate owns

pub mod schema;

mod draft_repository;
mod event_store;
mod transaction;

pub use draft_repository::PgDraftRepository;
pub use event_store::PgDomainEventStore;
pub use transaction::PgTransactionManager;
