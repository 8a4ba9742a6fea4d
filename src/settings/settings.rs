use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub storage: Storage,
    #[serde(default)]
    pub query: Query,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub tls: Option<Tls>,
}

#[derive(Debug, Deserialize)]
pub struct Tls {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub backend: String, // "memory" or "mysql"
    pub dsn: Option<String>,
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub unique_names: bool, // memory backend only
}

#[derive(Debug, Default, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub strict_params: bool,
    pub max_limit: Option<u32>,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// `CATALOG__HTTP__ADDRESS=0.0.0.0:8080` overrides `http.address`.
const ENV_PREFIX: &str = "CATALOG";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
