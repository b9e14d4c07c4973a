use std::net;

use serde::Deserialize;

/// Environment variable overriding [`Db::url`].
pub const DB_URL_VAR: &str = "SUPABASE_URL";

/// Environment variable overriding [`Db::key`].
pub const DB_KEY_VAR: &str = "SUPABASE_KEY";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub db: Db,
    pub http: Http,
}

impl Config {
    /// Overrides the store credentials with whatever `lookup` yields for
    /// [`DB_URL_VAR`] and [`DB_KEY_VAR`].
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        if let Some(url) = lookup(DB_URL_VAR) {
            self.db.url = url;
        }
        if let Some(key) = lookup(DB_KEY_VAR) {
            self.db.key = key;
        }
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct Db {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for Db {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    "company_logs".to_owned()
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub server: Server,
    #[serde(default)]
    pub cors: Cors,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub addr: net::SocketAddr,
}

#[derive(Debug, Default, Deserialize)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}
