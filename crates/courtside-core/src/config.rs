use anyhow::Result;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub directory: DirectoryConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub database: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub sender: String,
    pub dashboard_url: String,
}

impl MailConfig {
    /// ## Summary
    /// Returns the dashboard link advertised in invitation mails.
    #[must_use]
    pub fn event_management_url(&self) -> String {
        format!("{}/event-management", self.dashboard_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("store.database", "courtside")?
            .set_default("store.max_connections", 4)?
            .set_default("mail.dashboard_url", "https://courtside.example/dashboard")?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
