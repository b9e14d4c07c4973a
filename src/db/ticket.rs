use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{Client, Error, Store};

/// Columns projected by every select.
pub const COLUMNS: &str = "ticket_number,name,issue,assigned_to,priority";

const KEY_COLUMN: &str = "ticket_number";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ticket {
    pub ticket_number: String,
    pub name: String,
    pub issue: String,
    pub assigned_to: Option<String>,
    pub priority: String,
}

/// Non-key columns written by an update.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Changes {
    pub name: String,
    pub issue: String,
    pub assigned_to: Option<String>,
    pub priority: String,
}

fn eq(ticket_number: &str) -> String {
    format!("eq.{ticket_number}")
}

impl Client {
    async fn rows(
        &self,
        op: &'static str,
        req: RequestBuilder,
    ) -> Result<Vec<Ticket>, Error> {
        tracing::debug!(table = %self.table, op, "store request");

        let rows = read_rows(req.send().await?).await?;

        tracing::debug!(
            table = %self.table,
            op,
            rows = rows.len(),
            "store response",
        );
        Ok(rows)
    }

    fn returning(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Prefer", "return=representation")
    }
}

async fn read_rows(res: Response) -> Result<Vec<Ticket>, Error> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(Error::Status { status, body });
    }
    Ok(res.json().await?)
}

#[async_trait]
impl Store for Client {
    async fn insert_ticket(
        &self,
        ticket: &Ticket,
    ) -> Result<Vec<Ticket>, Error> {
        let req = self
            .returning(self.http.post(self.endpoint.clone()))
            .query(&[("select", COLUMNS)])
            .json(ticket);
        self.rows("insert", req).await
    }

    async fn select_tickets(
        &self,
        ticket_number: Option<&str>,
    ) -> Result<Vec<Ticket>, Error> {
        let mut req = self
            .http
            .get(self.endpoint.clone())
            .query(&[("select", COLUMNS)]);
        if let Some(ticket_number) = ticket_number {
            req = req.query(&[(KEY_COLUMN, eq(ticket_number))]);
        }
        self.rows("select", req).await
    }

    async fn update_ticket(
        &self,
        ticket_number: &str,
        changes: &Changes,
    ) -> Result<Vec<Ticket>, Error> {
        let req = self
            .returning(self.http.patch(self.endpoint.clone()))
            .query(&[(KEY_COLUMN, eq(ticket_number))])
            .query(&[("select", COLUMNS)])
            .json(changes);
        self.rows("update", req).await
    }

    async fn delete_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Vec<Ticket>, Error> {
        let req = self
            .returning(self.http.delete(self.endpoint.clone()))
            .query(&[(KEY_COLUMN, eq(ticket_number))])
            .query(&[("select", COLUMNS)]);
        self.rows("delete", req).await
    }
}
