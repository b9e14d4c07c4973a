use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use derive_more::From;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, config, db};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Company Logs and Tickets API!";

pub type SharedAppState = Arc<AppState>;

pub struct AppState {
    pub store: Box<dyn db::Store>,
}

impl AppState {
    pub fn new(store: impl db::Store + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route(
            "/tickets/:ticket_number",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub fn cors(
    config: &config::Cors,
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins)))
}

async fn read_root() -> Json<api::Message> {
    Json(api::Message {
        message: WELCOME_MESSAGE.to_owned(),
    })
}

async fn health_check() -> Json<api::Health> {
    Json(api::Health {
        status: "OK".to_owned(),
    })
}

async fn create_ticket(
    State(state): State<SharedAppState>,
    input: Result<Json<api::Ticket>, JsonRejection>,
) -> Result<Json<api::Ticket>, CreateTicketError> {
    let Json(ticket) = input?;

    let row = db::Ticket::from(ticket.clone());
    let inserted = state.store.insert_ticket(&row).await?;
    tracing::debug!(
        ticket_number = %ticket.ticket_number,
        rows = inserted.len(),
        "ticket created",
    );

    Ok(Json(ticket))
}

#[derive(Debug, From)]
pub enum CreateTicketError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidInput(JsonRejection),
}

impl IntoResponse for CreateTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidInput(rejection) => invalid_input(rejection),
            Self::DbError(e) => {
                tracing::error!(error = %e, "failed to create ticket");
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create ticket",
                )
            }
        }
    }
}

async fn list_tickets(
    State(state): State<SharedAppState>,
) -> Result<Json<Vec<api::Ticket>>, ListTicketsError> {
    let rows = state.store.select_tickets(None).await?;

    Ok(Json(rows.into_iter().map(api::Ticket::from).collect()))
}

#[derive(Debug, From)]
pub enum ListTicketsError {
    #[from]
    DbError(db::Error),
}

impl IntoResponse for ListTicketsError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => {
                tracing::error!(error = %e, "failed to fetch tickets");
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch tickets",
                )
            }
        }
    }
}

async fn get_ticket(
    State(state): State<SharedAppState>,
    Path(ticket_number): Path<String>,
) -> Result<Json<Vec<api::Ticket>>, GetTicketError> {
    use GetTicketError as E;

    let rows = state.store.select_tickets(Some(&ticket_number)).await?;
    if rows.is_empty() {
        return Err(E::TicketNotFound);
    }

    Ok(Json(rows.into_iter().map(api::Ticket::from).collect()))
}

#[derive(Debug, From)]
pub enum GetTicketError {
    #[from]
    DbError(db::Error),
    TicketNotFound,
}

impl IntoResponse for GetTicketError {
    fn into_response(self) -> Response {
        if let Self::DbError(e) = &self {
            tracing::error!(error = %e, "failed to fetch ticket");
        }
        detail(StatusCode::NOT_FOUND, "Ticket not found")
    }
}

async fn update_ticket(
    State(state): State<SharedAppState>,
    Path(ticket_number): Path<String>,
    input: Result<Json<api::Ticket>, JsonRejection>,
) -> Result<Json<api::Ticket>, UpdateTicketError> {
    let Json(ticket) = input?;

    let updated = state
        .store
        .update_ticket(&ticket_number, &ticket.changes())
        .await?;
    tracing::debug!(%ticket_number, rows = updated.len(), "ticket updated");

    Ok(Json(ticket))
}

#[derive(Debug, From)]
pub enum UpdateTicketError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidInput(JsonRejection),
}

impl IntoResponse for UpdateTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidInput(rejection) => invalid_input(rejection),
            Self::DbError(e) => {
                tracing::error!(error = %e, "failed to update ticket");
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update ticket",
                )
            }
        }
    }
}

async fn delete_ticket(
    State(state): State<SharedAppState>,
    Path(ticket_number): Path<String>,
) -> Result<Json<api::Message>, DeleteTicketError> {
    let deleted = state.store.delete_ticket(&ticket_number).await?;
    tracing::debug!(%ticket_number, rows = deleted.len(), "ticket deleted");

    Ok(Json(api::Message {
        message: "Ticket deleted successfully".to_owned(),
    }))
}

#[derive(Debug, From)]
pub enum DeleteTicketError {
    #[from]
    DbError(db::Error),
}

impl IntoResponse for DeleteTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => {
                tracing::error!(error = %e, "failed to delete ticket");
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to delete ticket",
                )
            }
        }
    }
}

fn detail(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(api::ErrorDetail {
            detail: detail.into(),
        }),
    )
        .into_response()
}

fn invalid_input(rejection: JsonRejection) -> Response {
    detail(rejection.status(), rejection.body_text())
}
