use std::{str::FromStr, time::Duration};

use analytics_query_handlers::CacheConfig;
use anyhow::{Context, bail};
use redis_connection::config::{MemoryConfig, RedisDbConfig};
use sql_connection::PostgresDbConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONN: u32 = 16;
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStoreKind {
    Redis,
    Memory,
}

impl FromStr for CacheStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown cache store {other:?}"),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub app_env: String,
    pub database: PostgresDbConfig,
    pub redis: RedisDbConfig,
    pub memory: MemoryConfig,
    pub cache_store: CacheStoreKind,
    pub cache: CacheConfig,
    pub query_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source. Unset or empty variables
    /// fall back to their defaults; set but unparsable ones are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let database = PostgresDbConfig {
            uri: var("DATABASE_URL")
                .unwrap_or_else(|| PostgresDbConfig::default().uri),
            max_conn: Some(
                parse(&var, "DATABASE_MAX_CONN")?.unwrap_or(DEFAULT_MAX_CONN),
            ),
            min_conn: parse(&var, "DATABASE_MIN_CONN")?,
        };

        let redis = RedisDbConfig {
            url: Some(
                var("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.into()),
            ),
            ..RedisDbConfig::default()
        };

        let cache = CacheConfig {
            ttl_seconds: parse(&var, "CACHE_TTL_SECONDS")?
                .unwrap_or(CacheConfig::default().ttl_seconds),
        };

        Ok(Self {
            port: parse(&var, "PORT")?.unwrap_or(DEFAULT_PORT),
            app_env: var("APP_ENV").unwrap_or_else(|| "development".into()),
            database,
            redis,
            memory: MemoryConfig::default(),
            cache_store: parse(&var, "CACHE_STORE")?
                .unwrap_or(CacheStoreKind::Redis),
            cache,
            query_timeout: parse(&var, "ANALYTICS_QUERY_TIMEOUT_MS")?
                .map(Duration::from_millis),
        })
    }
}

fn parse<T, F>(var: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("invalid {key}={raw:?}"))
        })
        .transpose()
}
