use std::io::{BufRead, Write};

use crate::client::FlowBoards;
use crate::comment;
use crate::error::Result;
use crate::output;
use crate::prompt;
use crate::resolve::{self, BinSelector};
use crate::state::CheckoutRecord;

/// Posts `text` on the checked-out ticket.
pub async fn quick<A: FlowBoards>(api: &A, record: &CheckoutRecord, text: &str) -> Result<()> {
    comment::post_comment(api, &record.ticket_id, text).await?;
    output::print_message(&format!("✓ Comment added to {}", record.ticket_name));
    Ok(())
}

/// Lets the user pick one of their tickets and type a comment for it.
pub async fn interactive<A: FlowBoards, R: BufRead, W: Write>(
    api: &A,
    bin: Option<&BinSelector>,
    board: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let user = api.current_user().await?;
    let query = resolve::ticket_query(api, &user.id, bin, board).await?;
    let tickets = api.search_tickets(&query).await?;

    if tickets.is_empty() {
        output::print_message("No tickets assigned to you.");
        return Ok(());
    }

    writeln!(output, "Your tickets:")?;
    prompt::print_numbered(output, &tickets)?;
    let ticket = prompt::select_ticket(input, output, &tickets, "Select ticket to comment on")?;
    let text = prompt::read_comment(input, output)?;

    comment::post_comment(api, &ticket.id, &text).await?;
    output::print_message(&format!("✓ Comment added to {}", ticket.name));
    Ok(())
}
