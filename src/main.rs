//! Newsroom backend entry point.
//!
//! Wires the event pipeline: configuration, database pool, broker channel,
//! handler registry, and the background publish server.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use newsroom::adapters::events::{DomainEventPublisher, PublishServer, RedisPublishChannel};
use newsroom::adapters::postgres::{
    schema, PgDomainEventStore, PgDraftRepository, PgTransactionManager,
};
use newsroom::application::events::build_handler_registry;
use newsroom::config::AppConfig;
use newsroom::domain::events::DomainEventDispatcher;
use newsroom::ports::PublishChannel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsroom=info")),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    schema::apply(&pool).await?;
    tracing::info!("database ready");

    let store = Arc::new(PgDomainEventStore::new(pool.clone()));
    let broker: Arc<dyn PublishChannel> =
        Arc::new(RedisPublishChannel::from_url(&config.redis.url)?);
    let publisher = Arc::new(DomainEventPublisher::new(
        vec![broker],
        store,
        config.events.send_batch_size,
    ));

    let drafts = Arc::new(PgDraftRepository::new(pool.clone()));
    let registry = Arc::new(build_handler_registry(drafts));
    let dispatcher = DomainEventDispatcher::new(Arc::clone(&registry));

    let mut publish_server = PublishServer::new(publisher);
    publish_server.start();

    // the transaction boundary handed to the business services
    let _transaction_manager =
        PgTransactionManager::new(pool, dispatcher, publish_server.signal());

    tracing::info!("newsroom backend running, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    publish_server.stop().await;
    tracing::info!("shutdown complete");
    Ok(())
}
