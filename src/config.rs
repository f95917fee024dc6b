use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub listen_addr: String,
}

impl Settings {
    /// Defaults overridden by `.env` and the process environment
    /// (`DATABASE_URL`, `LISTEN_ADDR`).
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        config::Config::builder()
            .set_default("database_url", "sqlite:trivia.db")?
            .set_default("listen_addr", "0.0.0.0:8080")?
            .add_source(config::Environment::default().try_parsing(false))
            .build()?
            .try_deserialize()
    }
}
