//! Persistence layer for the lab notebook: entities, migrations and the
//! explicit lifecycle updates (archiving, visibility, sharing).

pub mod entities;
pub mod lifecycle;
pub mod migrator;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info};

/// Connect to the database at `url` (`sqlite::memory:`, `sqlite://labnote.db?mode=rwc`,
/// `postgres://...`).
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // An in-memory SQLite database lives only as long as its connection
    if url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }

    debug!("Connecting to database");
    Database::connect(opts).await
}

/// Apply all pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migrator::Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}
