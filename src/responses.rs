//! Request and response bodies exchanged with the Flow Boards REST API.

use serde::{Deserialize, Serialize};

use crate::types::Ticket;

/// REST directory lookup result.
#[derive(Deserialize)]
pub struct RestPrefixResponse {
    #[serde(rename = "restUrlPrefix", default)]
    pub rest_prefix: String,
}

/// Ticket search returns a bare array; older deployments wrapped it.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TicketSearchBody {
    Bare(Vec<Ticket>),
    Wrapped { tickets: Vec<Ticket> },
}

impl TicketSearchBody {
    pub fn into_tickets(self) -> Vec<Ticket> {
        match self {
            TicketSearchBody::Bare(tickets) | TicketSearchBody::Wrapped { tickets } => tickets,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommentPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub ticket_id: String,
    pub comment: String,
}
