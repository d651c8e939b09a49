use deadpool_postgres::{Object, Pool, PoolError};

/// Cloneable handle over the event-store pool, injected into DAOs.
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    /// Get a pooled connection for read-only queries. The pool verifies a
    /// recycled connection before handing it out and opens a fresh one when
    /// the check fails.
    pub async fn get_read_client(&self) -> Result<Object, PoolError> {
        self.pool.get().await
    }

    /// Round-trip `SELECT 1` through the pool.
    pub async fn ping(&self) -> anyhow::Result<()> {
        let client = self.pool.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Get pool statistics for monitoring
    pub fn get_pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }

    /// Stop handing out connections and drop idle ones.
    pub fn close(&self) { self.pool.close() }

    pub fn is_closed(&self) -> bool { self.pool.is_closed() }
}
