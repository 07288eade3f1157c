use crate::error::ConfigError;
use tracing::debug;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, Settings};

/// Loads the application configuration.
///
/// Sources are layered, later ones winning: built-in defaults, an optional
/// `config.toml` next to the binary, then `SHOPFRONT_`-prefixed environment
/// variables (nested keys separated by `__`, e.g.
/// `SHOPFRONT_DATABASE__PASSWORD`). The password in particular is expected
/// to arrive through the environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432_i64)?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.name", "shopfront")?
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(
            config::Environment::with_prefix("SHOPFRONT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    debug!(
        host = %settings.database.host,
        port = settings.database.port,
        database = %settings.database.name,
        "configuration loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_when_nothing_is_configured() {
        // No config.toml in the test cwd and no SHOPFRONT_* vars set by the
        // suite, so this exercises the default layer.
        let settings = load_settings().expect("defaults should load");
        assert_eq!(settings.database.port, 5432);
        assert_eq!(settings.database.user, "postgres");
        assert_eq!(settings.database.name, "shopfront");
    }
}
