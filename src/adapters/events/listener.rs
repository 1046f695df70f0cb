//! DomainEventServer - dispatches an incoming event stream to handlers.
//!
//! Consumes an abstract asynchronous sequence of domain events (a broker
//! subscription, a replay log) and invokes the registered handlers for each
//! event. Handlers run concurrently and the server does not wait for one
//! event's handlers before consuming the next, so a slow handler never
//! stalls the stream.
//!
//! Unlike the commit-time dispatcher, a failing handler here must not stop
//! stream consumption: each invocation is guarded, failures are logged and
//! swallowed.

use futures::{Stream, StreamExt};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::domain::events::{DomainEvent, DomainEventHandler, DomainEventHandlerRegistry};

/// Background task consuming an event stream into the handler registry.
pub struct DomainEventServer {
    registry: Arc<DomainEventHandlerRegistry>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl DomainEventServer {
    /// Creates a stopped server over the shared handler registry.
    pub fn new(registry: Arc<DomainEventHandlerRegistry>) -> Self {
        Self {
            registry,
            shutdown: None,
            task: None,
        }
    }

    /// Spawns the consumer task over `stream` if none is running.
    ///
    /// Calling `start` on a running server has no additional effect; the
    /// new stream is dropped.
    pub fn start<S>(&mut self, stream: S)
    where
        S: Stream<Item = DomainEvent> + Send + 'static,
    {
        if self.task.is_some() {
            return;
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let registry = Arc::clone(&self.registry);
        self.task = Some(tokio::spawn(run_listen(stream, registry, shutdown_rx)));
        self.shutdown = Some(shutdown_tx);
        tracing::info!("domain event server started");
    }

    /// Stops the consumer task and awaits its termination.
    ///
    /// Handlers still in flight are aborted; no handler invocation starts
    /// after `stop` returns. Calling `stop` on an idle server is a no-op.
    pub async fn stop(&mut self) {
        let (Some(shutdown), Some(task)) = (self.shutdown.take(), self.task.take()) else {
            return;
        };
        let _ = shutdown.send(true);
        let _ = task.await;
        tracing::info!("domain event server stopped");
    }
}

async fn run_listen<S>(
    stream: S,
    registry: Arc<DomainEventHandlerRegistry>,
    mut shutdown: watch::Receiver<bool>,
) where
    S: Stream<Item = DomainEvent> + Send + 'static,
{
    let mut stream = std::pin::pin!(stream);
    let mut in_flight: JoinSet<()> = JoinSet::new();
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    // dropping the join set aborts in-flight handlers
                    return;
                }
            }
            next = stream.next() => match next {
                Some(event) => {
                    for handler in registry.get_handlers(event.kind()) {
                        in_flight.spawn(run_handler(Arc::clone(handler), event.clone()));
                    }
                }
                None => break,
            },
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
    // stream exhausted: let the in-flight handlers finish
    while in_flight.join_next().await.is_some() {}
}

async fn run_handler(handler: Arc<dyn DomainEventHandler>, event: DomainEvent) {
    if let Err(err) = handler.handle(event.clone()).await {
        tracing::error!(
            handler = handler.name(),
            event_type = %event.kind(),
            event_id = %event.event_id(),
            error = %err,
            "domain event handler failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::DomainEventKind;
    use crate::domain::foundation::DomainError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl DomainEventHandler for CountingHandler {
        async fn handle(&self, _: DomainEvent) -> Result<(), DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl DomainEventHandler for FailingHandler {
        async fn handle(&self, _: DomainEvent) -> Result<(), DomainError> {
            Err(DomainError::handler("boom"))
        }

        fn name(&self) -> &'static str {
            "FailingHandler"
        }
    }

    fn registry_with_counter() -> (Arc<DomainEventHandlerRegistry>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = DomainEventHandlerRegistry::new();
        registry.register(
            DomainEventKind::AuthorDeleted,
            Arc::new(CountingHandler(Arc::clone(&count))),
        );
        (Arc::new(registry), count)
    }

    #[tokio::test]
    async fn stream_events_reach_registered_handlers() {
        let (registry, count) = registry_with_counter();
        let mut server = DomainEventServer::new(registry);

        server.start(futures::stream::iter(vec![
            DomainEvent::author_deleted("a1"),
            DomainEvent::author_deleted("a2"),
        ]));
        tokio::time::sleep(Duration::from_millis(50)).await;
        server.stop().await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn events_of_other_kinds_are_ignored() {
        let (registry, count) = registry_with_counter();
        let mut server = DomainEventServer::new(registry);

        server.start(futures::stream::iter(vec![DomainEvent::news_article_published(
            "n1", "a1",
        )]));
        tokio::time::sleep(Duration::from_millis(50)).await;
        server.stop().await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_consumption() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = DomainEventHandlerRegistry::new();
        registry.register(DomainEventKind::AuthorDeleted, Arc::new(FailingHandler));
        registry.register(
            DomainEventKind::AuthorDeleted,
            Arc::new(CountingHandler(Arc::clone(&count))),
        );
        let mut server = DomainEventServer::new(Arc::new(registry));

        server.start(futures::stream::iter(vec![
            DomainEvent::author_deleted("a1"),
            DomainEvent::author_deleted("a2"),
        ]));
        tokio::time::sleep(Duration::from_millis(50)).await;
        server.stop().await;

        // both events got through despite the failing sibling handler
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stop_on_idle_server_is_a_no_op() {
        let (registry, _) = registry_with_counter();
        let mut server = DomainEventServer::new(registry);

        server.stop().await;
    }

    #[tokio::test]
    async fn stop_ends_consumption_of_a_pending_stream() {
        let (registry, count) = registry_with_counter();
        let mut server = DomainEventServer::new(registry);

        // a channel-backed stream that stays open with no sender activity
        let (tx, rx) = tokio::sync::mpsc::channel::<DomainEvent>(8);
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });
        server.start(stream);
        tokio::time::sleep(Duration::from_millis(20)).await;
        server.stop().await;

        // events sent after stop are never consumed
        let _ = tx.send(DomainEvent::author_deleted("a1")).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
