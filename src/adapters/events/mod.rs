//! Event pipeline adapters.
//!
//! - `DomainEventPublisher` - drains the outbox towards the publish channels
//! - `PublishServer` / `PublishSignal` - flag-driven background publishing
//! - `DomainEventServer` - dispatches an incoming event stream to handlers
//! - `RedisPublishChannel` - broker channel over Redis pub/sub
//! - `InMemoryDomainEventStore` / `InMemoryTransactionManager` - in-process
//!   implementations for tests and single-process deployments

mod in_memory;
mod listener;
mod publish_server;
mod publisher;
mod redis;

pub use in_memory::{InMemoryDomainEventStore, InMemoryTransactionManager};
pub use listener::DomainEventServer;
pub use publish_server::{PublishServer, PublishSignal};
pub use publisher::DomainEventPublisher;
pub use self::redis::RedisPublishChannel;
