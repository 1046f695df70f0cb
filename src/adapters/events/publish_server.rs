//! PublishServer - background task draining the outbox on demand.
//!
//! The server owns one background task that sleeps until its signal is set,
//! then runs a full publisher drain and goes back to waiting. Transaction
//! boundaries set the signal after every commit, so freshly written outbox
//! rows are picked up promptly instead of on a fixed poll interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::adapters::events::DomainEventPublisher;

/// Level-triggered "should publish" flag.
///
/// `set` requests a publish pass; `wait` suspends until the flag is set and
/// clears it on wake. A flag set while a pass is running is not lost: the
/// next `wait` returns immediately.
#[derive(Default)]
pub struct PublishSignal {
    flagged: AtomicBool,
    notify: Notify,
}

impl PublishSignal {
    /// Creates an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and wakes a waiter if one is suspended.
    pub fn set(&self) {
        self.flagged.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    /// Clears the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.flagged.swap(false, Ordering::AcqRel)
    }

    /// Whether the flag is currently set.
    pub fn is_set(&self) -> bool {
        self.flagged.load(Ordering::Acquire)
    }

    /// Suspends until the flag is set, then clears it.
    pub async fn wait(&self) {
        loop {
            if self.take() {
                return;
            }
            // notify_one stores a permit, so a set() racing with this await
            // still wakes us
            self.notify.notified().await;
        }
    }
}

/// Background task that repeatedly drains the publisher when signaled.
pub struct PublishServer {
    publisher: Arc<DomainEventPublisher>,
    signal: Arc<PublishSignal>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl PublishServer {
    /// Creates a stopped server with a fresh, unset signal.
    pub fn new(publisher: Arc<DomainEventPublisher>) -> Self {
        Self {
            publisher,
            signal: Arc::new(PublishSignal::new()),
            shutdown: None,
            task: None,
        }
    }

    /// The signal transaction boundaries use to request prompt publishing.
    pub fn signal(&self) -> Arc<PublishSignal> {
        Arc::clone(&self.signal)
    }

    /// Spawns the background task if none is running, and primes the signal
    /// so an initial publish attempt happens right away.
    ///
    /// Calling `start` on a running server has no additional effect.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let publisher = Arc::clone(&self.publisher);
        let signal = Arc::clone(&self.signal);
        self.task = Some(tokio::spawn(run(publisher, signal, shutdown_rx)));
        self.shutdown = Some(shutdown_tx);
        self.signal.set();
        tracing::info!("publish server started");
    }

    /// Stops the background task and awaits its termination.
    ///
    /// A publish pass in flight finishes its current drain before the task
    /// exits, so no publish activity continues after `stop` returns.
    /// Calling `stop` on an idle server is a no-op.
    pub async fn stop(&mut self) {
        let (Some(shutdown), Some(task)) = (self.shutdown.take(), self.task.take()) else {
            return;
        };
        let _ = shutdown.send(true);
        let _ = task.await;
        tracing::info!("publish server stopped");
    }
}

async fn run(
    publisher: Arc<DomainEventPublisher>,
    signal: Arc<PublishSignal>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    // honor a pending publish request before exiting
                    if signal.take() {
                        run_publish_pass(&publisher).await;
                    }
                    return;
                }
            }
            () = signal.wait() => {
                run_publish_pass(&publisher).await;
            }
        }
    }
}

async fn run_publish_pass(publisher: &DomainEventPublisher) {
    if let Err(err) = publisher.publish().await {
        // store trouble: abandon this pass, the next signal retries
        tracing::warn!(error = %err, "publish pass abandoned");
    }
}
