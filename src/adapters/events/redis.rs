//! Redis publish channel.
//!
//! Publishes the canonical JSON form of each event to the Redis channel
//! `domain.<event_type>`. The multiplexed connection is cached across calls
//! and dropped on any transport error, so the next publish re-establishes
//! it.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use crate::domain::events::DomainEvent;
use crate::domain::foundation::DomainError;
use crate::ports::PublishChannel;

fn channel_name(event: &DomainEvent) -> String {
    format!("domain.{}", event.kind())
}

/// `PublishChannel` implementation over Redis pub/sub.
pub struct RedisPublishChannel {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisPublishChannel {
    /// Creates a channel over an existing client. No connection is opened
    /// until the first publish.
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            connection: Mutex::new(None),
        }
    }

    /// Creates a channel from a `redis://` URL.
    pub fn from_url(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PublishChannel for RedisPublishChannel {
    async fn publish(&self, event: &DomainEvent) -> Result<(), DomainError> {
        let channel = channel_name(event);
        let payload = event.to_wire_json().into_bytes();

        let mut guard = self.connection.lock().await;
        // take the cached connection; it is only put back on success, so a
        // transport failure forces a reconnect on the next call
        let mut connection = match guard.take() {
            Some(connection) => connection,
            None => self.client.get_multiplexed_tokio_connection().await?,
        };

        let result: Result<i64, redis::RedisError> =
            connection.publish(channel.as_str(), payload).await;
        match result {
            Ok(_) => {
                *guard = Some(connection);
                Ok(())
            }
            Err(err) => Err(DomainError::from(err).with_detail("channel", channel)),
        }
    }
}
