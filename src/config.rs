use crate::error::{Error, Result};
use serde::Deserialize;

/// Application configuration loaded from `MOVIEDECK_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of the sled database. A temporary store is used when unset.
    pub database_path: Option<String>,

    /// Fill an empty store with the demo catalog and users
    #[serde(default = "default_seed")]
    pub seed: bool,

    /// Signing key of the session cookie, at least 32 bytes
    #[serde(default = "default_cookie_key")]
    pub cookie_key: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Glob of the tera templates
    #[serde(default = "default_templates")]
    pub templates: String,

    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_seed() -> bool {
    true
}

fn default_cookie_key() -> String {
    "0".repeat(32)
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_templates() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*").to_owned()
}

fn default_log() -> String {
    "moviedeck=debug,actix_web=info".to_owned()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    pub fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::prefixed("MOVIEDECK_").from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cookie_key.len() < 32 {
            return Err(Error::InvalidConfig(
                "MOVIEDECK_COOKIE_KEY must be at least 32 bytes".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn open_db(&self) -> Result<sled::Db> {
        let db = match &self.database_path {
            Some(path) => sled::Config::new().path(path).open()?,
            None => sled::Config::new().temporary(true).open()?,
        };
        Ok(db)
    }
}
