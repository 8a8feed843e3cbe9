mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use keyhole_cache::{MokaUrlCache, RedisUrlCache};
use keyhole_core::UrlStore;
use keyhole_gateway::app::App;
use keyhole_gateway::auth::ApiKeySet;
use keyhole_gateway::state::AppState;
use keyhole_gateway::telemetry;
use keyhole_resolver::{Resolver, ResolverService};
use keyhole_storage::{InMemoryStore, MySqlStore};
use tracing::{info, warn};

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;

    let provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        base_url = %config.base_url,
        "starting gateway server"
    );

    let api_keys = ApiKeySet::parse(&config.api_keys).context("parse api keys")?;
    if api_keys.is_empty() {
        warn!("no api keys configured, every shorten request will be rejected");
    }

    let resolver = build_resolver(&config).await?;
    let state = AppState::new(resolver, api_keys);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context("bind listen address")?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state)).await?;

    if let Some(provider) = provider {
        if let Err(e) = provider.shutdown() {
            warn!(error = %e, "failed to shut down otlp exporter");
        }
    }

    Ok(())
}

async fn build_resolver(config: &CLI) -> anyhow::Result<Arc<dyn Resolver>> {
    match config.storage {
        StorageBackendArg::InMemory => with_cache(InMemoryStore::new(), config).await,
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlStore::connect(dsn).await.context("connect mysql")?;
            with_cache(store, config).await
        }
    }
}

async fn with_cache<S: UrlStore>(store: S, config: &CLI) -> anyhow::Result<Arc<dyn Resolver>> {
    Ok(match config.redis_url.as_deref() {
        Some(redis_url) => {
            let cache = RedisUrlCache::connect(redis_url)
                .await
                .context("connect redis")?;
            Arc::new(ResolverService::new(store, cache, config.base_url.clone()))
        }
        None => {
            let cache = MokaUrlCache::with_ttl(10_000, Duration::from_secs(config.cache_ttl_secs));
            Arc::new(ResolverService::new(store, cache, config.base_url.clone()))
        }
    })
}
