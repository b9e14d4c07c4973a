pub mod ticket;

use async_trait::async_trait;
use derive_more::{Display, From};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    StatusCode, Url,
};

use crate::config;

pub use self::ticket::Ticket;

/// Remote table operations the HTTP layer depends on.
///
/// Every method is a single round trip and returns the rows the store
/// reports as affected.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<Vec<Ticket>, Error>;

    /// Lists tickets, optionally only those with the given ticket number.
    async fn select_tickets(
        &self,
        ticket_number: Option<&str>,
    ) -> Result<Vec<Ticket>, Error>;

    async fn update_ticket(
        &self,
        ticket_number: &str,
        changes: &ticket::Changes,
    ) -> Result<Vec<Ticket>, Error>;

    async fn delete_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Vec<Ticket>, Error>;
}

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("invalid store configuration: {_0}")]
    Config(&'static str),

    #[from]
    #[display("store request failed: {_0}")]
    Transport(reqwest::Error),

    #[display("store responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl std::error::Error for Error {}

/// Builds a [`Client`] for the configured table.
///
/// Nothing is sent over the network here; bad credentials surface on the
/// first request.
pub fn connect(config: config::Db) -> Result<Client, Error> {
    if config.url.trim().is_empty() {
        return Err(Error::Config("store URL is not set"));
    }
    if config.key.trim().is_empty() {
        return Err(Error::Config("store key is not set"));
    }
    if config.table.trim().is_empty() {
        return Err(Error::Config("store table is not set"));
    }

    let mut base = Url::parse(&config.url)
        .map_err(|_| Error::Config("store URL is not a valid URL"))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let endpoint = base
        .join(&format!("rest/v1/{}", config.table))
        .map_err(|_| Error::Config("store URL cannot be a base"))?;

    let mut headers = HeaderMap::new();
    let mut api_key = HeaderValue::from_str(&config.key)
        .map_err(|_| Error::Config("store key is not a valid header"))?;
    api_key.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
        .map_err(|_| Error::Config("store key is not a valid header"))?;
    bearer.set_sensitive(true);
    headers.insert("apikey", api_key);
    headers.insert(AUTHORIZATION, bearer);

    let http = reqwest::Client::builder().default_headers(headers).build()?;

    Ok(Client {
        http,
        endpoint,
        table: config.table,
    })
}

/// Handle to one table of the remote store.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
    table: String,
}

impl Client {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
