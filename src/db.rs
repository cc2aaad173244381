use std::str::FromStr;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};

use crate::error::AppResult;

/// Connect and run pending migrations. `foreign_keys` and `synchronous` are
/// connection-scoped in sqlite, so they go through the connect options and
/// apply to every connection the pool opens, not just the first.
pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("parse DATABASE_URL")?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("connect to sqlite")?;
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

    Migrator::up(&db, None).await?;
    Ok(db)
}
