use serde::{Deserialize, Serialize};

use crate::db;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ticket {
    pub ticket_number: String,
    pub name: String,
    pub issue: String,
    pub assigned_to: Option<String>,
    pub priority: String,
}

impl Ticket {
    /// Splits off everything an update is allowed to overwrite.
    pub fn changes(&self) -> db::ticket::Changes {
        db::ticket::Changes {
            name: self.name.clone(),
            issue: self.issue.clone(),
            assigned_to: self.assigned_to.clone(),
            priority: self.priority.clone(),
        }
    }
}

impl From<db::Ticket> for Ticket {
    fn from(row: db::Ticket) -> Self {
        Self {
            ticket_number: row.ticket_number,
            name: row.name,
            issue: row.issue,
            assigned_to: row.assigned_to,
            priority: row.priority,
        }
    }
}

impl From<Ticket> for db::Ticket {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_number: ticket.ticket_number,
            name: ticket.name,
            issue: ticket.issue,
            assigned_to: ticket.assigned_to,
            priority: ticket.priority,
        }
    }
}
