use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{DbConnectConfig, DbOptionsConfig},
    impl_get_connect::SqlConnect,
};

/// Pre-warms a connection pool by creating connections up front.
///
/// Every checked-out connection is held until all tasks finish, so the pool
/// has to open `count` distinct connections (capped at its max size).
async fn prewarm_pool(pool: &Pool, count: u32) {
    let count = count.min(pool.status().max_size as u32);
    debug!("Pre-warming pool with {} connections", count);
    let mut handles = vec![];

    for i in 0..count {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            match pool.get().await {
                Ok(conn) => {
                    debug!("Pre-warmed connection {}/{}", i + 1, count);
                    Some(conn)
                }
                Err(e) => {
                    warn!("Failed to pre-warm connection {}: {}", i + 1, e);
                    None
                }
            }
        }));
    }

    let mut warmed = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Some(conn)) => warmed.push(conn),
            Ok(None) => {}
            Err(e) => warn!("Pre-warm task failed: {}", e),
        }
    }
    drop(warmed);

    let status = pool.status();
    info!(
        "Pool pre-warming complete: {} connections available",
        status.available
    );
}

/// Build the pool without opening any connection. Connections are created on
/// first checkout.
pub fn build_postgres_pool<C>(config: &C) -> Result<Pool, anyhow::Error>
where
    C: DbConnectConfig + DbOptionsConfig,
{
    let pg_config = config.uri().parse::<tokio_postgres::Config>()?;

    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Verified,
    };
    let mgr = Manager::from_config(pg_config, NoTls, mgr_config);

    let mut pool_builder = Pool::builder(mgr)
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .wait_timeout(Some(Duration::from_millis(2000)))
        .create_timeout(Some(Duration::from_millis(5000)))
        .recycle_timeout(Some(Duration::from_millis(1000)));

    if let Some(max_conn) = config.max_conn() {
        pool_builder = pool_builder.max_size(max_conn as usize);
    }

    Ok(pool_builder.build()?)
}

#[instrument(skip_all, name = "connect-pgsql")]
pub async fn connect_postgres_db<C>(
    config: &C,
) -> Result<SqlConnect, anyhow::Error>
where
    C: DbConnectConfig + DbOptionsConfig,
{
    info!(
        postgres.max_conn = ?config.max_conn(),
        postgres.min_conn = ?config.min_conn()
    );

    let pool = build_postgres_pool(config)?;

    if let Some(min_conn) = config.min_conn() {
        prewarm_pool(&pool, min_conn).await;
    }

    Ok(SqlConnect::new(pool))
}
