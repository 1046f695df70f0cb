//! DomainEventPublisher - drains the outbox towards the publish channels.
//!
//! One `publish()` pass fetches bounded batches of unsent events from the
//! store and pushes every event to every configured channel. An event is
//! acknowledged only when all of its channel pushes succeed; anything less
//! leaves it unsent for a later pass. Delivery is therefore at-least-once.
//! Backoff between passes is a deployment concern, not this component's.

use futures::future::join_all;
use std::sync::Arc;

use crate::domain::events::DomainEvent;
use crate::domain::foundation::DomainError;
use crate::ports::{DomainEventStore, PublishChannel};

/// Fans unsent events out to every publish channel and acknowledges
/// full successes in the store.
pub struct DomainEventPublisher {
    channels: Vec<Arc<dyn PublishChannel>>,
    store: Arc<dyn DomainEventStore>,
    send_batch_size: usize,
}

impl DomainEventPublisher {
    /// Creates a publisher over the given channels and store.
    ///
    /// `send_batch_size` bounds how many events one fetch may return.
    pub fn new(
        channels: Vec<Arc<dyn PublishChannel>>,
        store: Arc<dyn DomainEventStore>,
        send_batch_size: usize,
    ) -> Self {
        Self {
            channels,
            store,
            send_batch_size,
        }
    }

    /// Runs one full drain of the outbox.
    ///
    /// Fetches and publishes batch after batch until a fetch comes back
    /// empty, or until a whole batch fails to make progress (every event
    /// left unacknowledged), in which case the remaining events wait for
    /// the next pass. Store errors abandon the pass.
    pub async fn publish(&self) -> Result<(), DomainError> {
        loop {
            let batch = self.store.get_not_sent_events(self.send_batch_size).await?;
            if batch.is_empty() {
                return Ok(());
            }
            let fetched = batch.len();
            let results = join_all(batch.into_iter().map(|event| self.publish_event(event))).await;
            let mut acked = 0usize;
            for result in results {
                if result? {
                    acked += 1;
                }
            }
            if acked == 0 {
                tracing::warn!(
                    pending = fetched,
                    "no event in the batch could be published, leaving the rest for retry"
                );
                return Ok(());
            }
        }
    }

    /// Publishes one event to every channel concurrently.
    ///
    /// Returns `Ok(true)` when the event was acknowledged, `Ok(false)` when
    /// a channel failed and the event stays unsent. Only store failures
    /// escalate as errors.
    async fn publish_event(&self, event: DomainEvent) -> Result<bool, DomainError> {
        let pushes = self.channels.iter().map(|channel| channel.publish(&event));
        let failure = join_all(pushes)
            .await
            .into_iter()
            .find_map(Result::err);
        if let Some(err) = failure {
            tracing::warn!(
                event_type = %event.kind(),
                event_id = %event.event_id(),
                error = %err,
                "channel publish failed, event stays unsent"
            );
            return Ok(false);
        }
        self.store.ack_event_send(&event).await?;
        tracing::debug!(
            event_type = %event.kind(),
            event_id = %event.event_id(),
            "event published and acknowledged"
        );
        Ok(true)
    }
}
