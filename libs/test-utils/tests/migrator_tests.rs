use anyhow::Result;
use test_utils::TestPostgresContainer;

#[tokio::test]
async fn test_migrations_are_recorded() -> Result<()> {
    let postgres = TestPostgresContainer::new().await?;
    let migrator = postgres.get_migrator();

    let applied = migrator.list_applied_migrations().await?;

    assert_eq!(applied, vec!["001_create_events".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_migrations_are_idempotent() -> Result<()> {
    let postgres = TestPostgresContainer::new().await?;
    let migrator = postgres.get_migrator();

    migrator.run_all_migrations().await?;

    assert_eq!(migrator.list_applied_migrations().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_reset_drops_events_table() -> Result<()> {
    let postgres = TestPostgresContainer::new().await?;
    let migrator = postgres.get_migrator();

    migrator.reset_all().await?;

    assert!(migrator.list_applied_migrations().await?.is_empty());
    assert!(postgres.execute_sql("SELECT 1 FROM events").await.is_err());

    migrator.run_all_migrations().await?;
    postgres.execute_sql("SELECT 1 FROM events").await?;
    Ok(())
}
