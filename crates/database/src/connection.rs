use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is built from explicit, caller-owned settings rather than a
/// process-global handle: to reconnect with different parameters, load new
/// settings and call this again. A failure here is the single "database is
/// unavailable" signal; nothing downstream ever holds a half-connected
/// handle.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        "connected to PostgreSQL"
    );

    Ok(pool)
}
