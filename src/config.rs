use crate::errors::ConfigError;
use std::env;

const DEFAULT_PORT: u16 = 8080;

/// Where the series is kept between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// Per-browser `graphData` cookie.
    #[default]
    Cookie,
    /// One series in process memory, shared by every client.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::var("PORT").ok(), env::var("APP_STORE").ok())
    }

    pub fn from_vars(port: Option<String>, store: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let store = match store.as_deref().map(str::trim) {
            None | Some("") => StoreKind::default(),
            Some(value) if value.eq_ignore_ascii_case("cookie") => StoreKind::Cookie,
            Some(value) if value.eq_ignore_ascii_case("memory") => StoreKind::Memory,
            Some(value) => return Err(ConfigError::UnknownStore(value.to_string())),
        };

        Ok(Self { port, store })
    }
}
