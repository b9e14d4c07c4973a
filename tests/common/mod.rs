#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::Router;
use company_logs::{api, db, server};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::{net, task};

/// Store keeping rows in memory, like a remote table without constraints.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Vec<db::Ticket>>>,
}

#[async_trait]
impl db::Store for MemoryStore {
    async fn insert_ticket(
        &self,
        ticket: &db::Ticket,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        self.rows.lock().unwrap().push(ticket.clone());
        Ok(vec![ticket.clone()])
    }

    async fn select_tickets(
        &self,
        ticket_number: Option<&str>,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| {
                ticket_number.map_or(true, |n| row.ticket_number == n)
            })
            .cloned()
            .collect())
    }

    async fn update_ticket(
        &self,
        ticket_number: &str,
        changes: &db::ticket::Changes,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .filter(|row| row.ticket_number == ticket_number)
            .map(|row| {
                row.name.clone_from(&changes.name);
                row.issue.clone_from(&changes.issue);
                row.assigned_to.clone_from(&changes.assigned_to);
                row.priority.clone_from(&changes.priority);
                row.clone()
            })
            .collect())
    }

    async fn delete_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        let mut rows = self.rows.lock().unwrap();
        let (deleted, kept): (Vec<_>, Vec<_>) = rows
            .drain(..)
            .partition(|row| row.ticket_number == ticket_number);
        *rows = kept;
        Ok(deleted)
    }
}

/// Store whose every call fails, counting how often it was reached.
#[derive(Clone, Default)]
pub struct FailingStore {
    pub calls: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<Vec<db::Ticket>, db::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(db::Error::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "store is down".to_owned(),
        })
    }
}

#[async_trait]
impl db::Store for FailingStore {
    async fn insert_ticket(
        &self,
        _: &db::Ticket,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        self.fail()
    }

    async fn select_tickets(
        &self,
        _: Option<&str>,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        self.fail()
    }

    async fn update_ticket(
        &self,
        _: &str,
        _: &db::ticket::Changes,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        self.fail()
    }

    async fn delete_ticket(
        &self,
        _: &str,
    ) -> Result<Vec<db::Ticket>, db::Error> {
        self.fail()
    }
}

pub fn ticket(ticket_number: &str) -> api::Ticket {
    api::Ticket {
        ticket_number: ticket_number.to_owned(),
        name: "Alice".to_owned(),
        issue: "printer jam".to_owned(),
        assigned_to: None,
        priority: "low".to_owned(),
    }
}

pub struct Client {
    inner: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Serves the API on an ephemeral port backed by `store`.
    pub async fn spawn(store: impl db::Store + 'static) -> Self {
        Self::serve(server::router(server::AppState::new(store))).await
    }

    /// Serves `app` on an ephemeral port.
    pub async fn serve(app: Router) -> Self {
        let listener = net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local address");
        task::spawn(async move {
            axum::serve(listener, app).await.expect("server failed");
        });

        Self {
            inner: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .inner
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("failed to send a request");
        let status = res.status();
        (status, res.json().await.expect("failed to get a response"))
    }

    pub async fn create_ticket_raw(&self, body: &Value) -> (StatusCode, Value) {
        let res = self
            .inner
            .post(format!("{}/tickets", self.base_url))
            .json(body)
            .send()
            .await
            .expect("failed to send a request");
        let status = res.status();
        (status, res.json().await.expect("failed to get a response"))
    }

    /// Posts `body` verbatim, with `content_type` if any.
    pub async fn create_ticket_text(
        &self,
        body: &'static str,
        content_type: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = self.inner.post(format!("{}/tickets", self.base_url));
        if let Some(content_type) = content_type {
            req = req.header("Content-Type", content_type);
        }
        let res = req
            .body(body)
            .send()
            .await
            .expect("failed to send a request");
        let status = res.status();
        (status, res.json().await.expect("failed to get a response"))
    }

    pub async fn update_ticket_raw(
        &self,
        ticket_number: &str,
        body: &Value,
    ) -> (StatusCode, Value) {
        let res = self
            .inner
            .put(format!("{}/tickets/{ticket_number}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("failed to send a request");
        let status = res.status();
        (status, res.json().await.expect("failed to get a response"))
    }

    pub async fn create_ticket(
        &self,
        ticket: &api::Ticket,
    ) -> Result<api::Ticket, StatusCode> {
        Ok(self
            .inner
            .post(format!("{}/tickets", self.base_url))
            .json(ticket)
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::Ticket>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn list_tickets(&self) -> Result<Vec<api::Ticket>, StatusCode> {
        Ok(self
            .inner
            .get(format!("{}/tickets", self.base_url))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<Vec<api::Ticket>>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn get_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Vec<api::Ticket>, StatusCode> {
        Ok(self
            .inner
            .get(format!("{}/tickets/{ticket_number}", self.base_url))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<Vec<api::Ticket>>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn update_ticket(
        &self,
        ticket_number: &str,
        ticket: &api::Ticket,
    ) -> Result<api::Ticket, StatusCode> {
        Ok(self
            .inner
            .put(format!("{}/tickets/{ticket_number}", self.base_url))
            .json(ticket)
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::Ticket>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn delete_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<api::Message, StatusCode> {
        Ok(self
            .inner
            .delete(format!("{}/tickets/{ticket_number}", self.base_url))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::Message>()
            .await
            .expect("failed to get a response"))
    }
}
