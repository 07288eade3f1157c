use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
}

/// Connection parameters for the PostgreSQL database.
///
/// These are plain data: the database crate turns them into a live pool, and
/// reconnecting with different parameters is just loading (or editing) a new
/// `DatabaseSettings` and building a new pool from it. Nothing holds these
/// globally.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Usually supplied via the environment rather than the file.
    pub password: String,
    /// Database name.
    pub name: String,
}
