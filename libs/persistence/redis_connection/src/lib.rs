use std::time::Duration;

use deadpool_redis::{Config, CreatePoolError, Pool, PoolConfig, Runtime};
pub use deadpool_redis::{PoolError, redis::RedisError};
use tracing::{info, instrument};
use url::Url;

pub mod config;
pub mod connection;
pub mod core;
pub mod macros;
pub mod memory;
pub mod store;

pub use connection::RedisCacheStore;
pub use memory::MemoryCacheStore;
pub use store::{CacheStore, CacheStoreError};

#[derive(Debug, thiserror::Error)]
pub enum RedisConnectError {
    #[error("Invalid Redis URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(#[from] CreatePoolError),
}

/// Resolve the connection string: an explicit URL wins, otherwise one is
/// assembled from host, port and database index.
pub fn redis_url<C>(config: &C) -> Result<Url, url::ParseError>
where
    C: config::DbConnectConfig,
{
    if let Some(url) = config.url() {
        return Url::parse(url);
    }

    let mut url =
        Url::parse(&format!("redis://{}:{}", config.host(), config.port()))?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .extend(&[config.db().to_string()]);
    if let Some(password) = config.password() {
        url.set_password(Some(password))
            .map_err(|_| url::ParseError::EmptyHost)?;
    }
    Ok(url)
}

/// Build the Redis pool. No connection is opened here; the pool connects on
/// first checkout and pings idle connections before reusing them.
#[instrument(skip_all, name = "connect-redis")]
pub fn connect_redis_db<C>(config: &C) -> Result<Pool, RedisConnectError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(
        redis.host = url.host_str().unwrap_or_default(),
        redis.max_conn = config.max_conn(),
        redis.connect = true
    );

    let timeout = Duration::from_millis(config.timeout_ms());
    let mut pool = PoolConfig::new(config.max_conn());
    pool.timeouts.wait = Some(timeout);
    pool.timeouts.create = Some(timeout);
    pool.timeouts.recycle = Some(timeout);

    let mut cfg = Config::from_url(url.as_str());
    cfg.pool = Some(pool);

    Ok(cfg.create_pool(Some(Runtime::Tokio1))?)
}
