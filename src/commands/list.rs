use std::time::Instant;

use colored::Colorize;
use tabled::Tabled;
use tracing::info;

use crate::client::FlowBoards;
use crate::error::Result;
use crate::output::{self, format_date_only, status_colored, truncate};
use crate::resolve::{self, BinSelector};
use crate::state::StateStore;
use crate::types::Ticket;

const CHECKED_OUT_MARKER: &str = "← CHECKED OUT";

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Bin")]
    bin: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "")]
    marker: String,
}

impl TicketRow {
    fn new(ticket: &Ticket, checked_out: Option<&str>) -> Self {
        let marker = if checked_out == Some(ticket.id.as_str()) {
            CHECKED_OUT_MARKER.green().bold().to_string()
        } else {
            String::new()
        };

        Self {
            id: ticket.id.clone(),
            name: truncate(&ticket.name, 50),
            bin: status_colored(ticket.status()),
            due: format_date_only(ticket.due_date.as_ref()),
            marker,
        }
    }
}

/// Lists the user's tickets, optionally narrowed to a bin and board.
pub async fn run<A: FlowBoards>(
    api: &A,
    store: &StateStore,
    bin: Option<&BinSelector>,
    board: Option<&str>,
) -> Result<()> {
    let started = Instant::now();
    let user = api.current_user().await?;
    let query = resolve::ticket_query(api, &user.id, bin, board).await?;
    let tickets = api.search_tickets(&query).await?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        count = tickets.len(),
        "fetched tickets"
    );

    if tickets.is_empty() {
        output::print_message("No tickets assigned to you.");
        return Ok(());
    }

    let checkout = store.load_checkout();
    let checked_out = checkout.record().map(|r| r.ticket_id.as_str());
    output::print_table(&tickets, |t| TicketRow::new(t, checked_out));

    Ok(())
}
