use deadpool_postgres::Pool;
use tracing::info;

const MIGRATIONS: &[(&str, &str, &str)] = &[(
    "001_create_events",
    include_str!(
        "../../../domains/analytics/migrations/sql/001_create_events.sql"
    ),
    include_str!(
        "../../../domains/analytics/migrations/sql/001_create_events.down.sql"
    ),
)];

/// Applies the plain `.sql` migrations, tracking them in `_migrations`.
pub struct SqlMigrator {
    pool: Pool,
}

impl SqlMigrator {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    /// Run all migrations in order
    pub async fn run_all_migrations(&self) -> anyhow::Result<()> {
        self.create_migration_table().await?;

        for (migration_name, up_sql, _) in MIGRATIONS {
            if self.is_migration_applied(migration_name).await? {
                info!("Migration {} already applied, skipping", migration_name);
                continue;
            }

            let mut client = self.pool.get().await?;
            let tx = client.transaction().await?;
            tx.batch_execute(up_sql).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to run migration {}: {}",
                    migration_name,
                    e
                )
            })?;
            tx.execute(
                "INSERT INTO _migrations (name, applied_at) VALUES ($1, NOW())",
                &[migration_name],
            )
            .await?;
            tx.commit().await?;

            info!("Migration {} completed successfully", migration_name);
        }

        Ok(())
    }

    /// Roll back every applied migration, newest first
    pub async fn reset_all(&self) -> anyhow::Result<()> {
        let applied = self.list_applied_migrations().await?;

        for (migration_name, _, down_sql) in MIGRATIONS.iter().rev() {
            if !applied.iter().any(|name| name == migration_name) {
                continue;
            }

            let mut client = self.pool.get().await?;
            let tx = client.transaction().await?;
            tx.batch_execute(down_sql).await?;
            tx.execute("DELETE FROM _migrations WHERE name = $1", &[
                migration_name,
            ])
            .await?;
            tx.commit().await?;

            info!("Migration {} rolled back", migration_name);
        }

        Ok(())
    }

    pub async fn list_applied_migrations(&self) -> anyhow::Result<Vec<String>> {
        self.create_migration_table().await?;

        let client = self.pool.get().await?;
        let rows = client
            .query("SELECT name FROM _migrations ORDER BY applied_at, id", &[])
            .await?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn create_migration_table(&self) -> anyhow::Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(
                r#"
                CREATE TABLE IF NOT EXISTS _migrations (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(255) NOT NULL UNIQUE,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
            )
            .await?;
        Ok(())
    }

    async fn is_migration_applied(
        &self, migration_name: &str,
    ) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM _migrations WHERE name = $1", &[
                &migration_name,
            ])
            .await?;
        let count: i64 = row.get(0);
        Ok(count > 0)
    }
}
