//! Connection pool setup and startup migrations.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::DatabaseConfig;
use crate::migration::Migrator;

/// # Errors
/// The database is unreachable, or a migration fails when
/// `run_migrations` is on.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;
    tracing::info!(backend = ?db.get_database_backend(), "Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await?;
        tracing::info!("Database migrations complete");
    }
    Ok(db)
}
