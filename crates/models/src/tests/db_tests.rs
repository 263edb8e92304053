use crate::db::{connect_with_config, test_connection, DatabaseConfig};
use anyhow::Result;

/// Test basic database connection
#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    let Some(db) = super::setup().await else { return Ok(()) };
    test_connection(&db).await?;
    Ok(())
}

/// Test connection with custom configuration
#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if super::setup().await.is_none() {
        return Ok(());
    }
    let config = DatabaseConfig {
        url: crate::db::DATABASE_URL.clone(),
        max_connections: 5,
        min_connections: 1,
        connect_timeout_secs: 10,
        acquire_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 600,
        sqlx_logging: false,
    };
    let db = connect_with_config(&config).await?;
    test_connection(&db).await?;
    Ok(())
}
