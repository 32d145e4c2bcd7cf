use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,

    // sessions
    #[serde(default)]
    pub session_secure: bool,
    #[serde(default = "default_session_expiry_days")]
    pub session_expiry_days: i64,

    // logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "sqlite.db".into()
}

fn default_session_expiry_days() -> i64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: default_database_url(),
            session_secure: false,
            session_expiry_days: default_session_expiry_days(),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Loads the configuration from the environment. Must run before the first [`config`] call.
pub fn init() -> Result<&'static Config, envy::Error> {
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = envy::from_iter::<_, Config>(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.database_url, "sqlite.db");
        assert_eq!(config.session_expiry_days, 1);
        assert!(!config.session_secure);
        assert!(!config.log_json);
    }

    #[test]
    fn overrides() {
        let config = envy::from_iter::<_, Config>(vec![
            ("port".to_string(), "8080".to_string()),
            ("database_url".to_string(), "notes.db".to_string()),
            ("session_secure".to_string(), "true".to_string()),
            ("log_json".to_string(), "true".to_string()),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "notes.db");
        assert!(config.session_secure);
        assert!(config.log_json);
    }
}
