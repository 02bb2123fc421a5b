//! Database lifecycle.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::server::{config::ServiceSettings, error::Error};

/// Connects to `services.db_uri` and brings the schema up to date.
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected and migrated
/// - `Err(Error::DbErr)` - Connection failed or a migration could not be applied
pub async fn init_db(services: &ServiceSettings) -> Result<DatabaseConnection, Error> {
    let mut opt = ConnectOptions::new(services.db_uri.as_str());
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    tracing::debug!(db_uri = %services.db_uri, "database initialized");

    Ok(db)
}

/// Closes the connection pool.
///
/// Pending writes are flushed and file handles released, so a file-backed database may
/// be removed afterwards.
pub async fn finalize_db(db: DatabaseConnection) -> Result<(), Error> {
    db.close().await?;

    Ok(())
}
