#![cfg(test)]
use sea_orm::DatabaseConnection;
use configs::DatabaseConfig;
use models::db::connect_with_config;

/// Fresh in-memory SQLite database per test, initialized the same way the server does it.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { dialect: "sqlite".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    crate::blog_service::initialize(&db).await?;
    Ok(db)
}
