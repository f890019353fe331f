//! Transitions of the single checked-out ticket.
//!
//! Every transition checks for a conflicting record before it talks to the
//! API, and writes local state only after all remote calls have succeeded.

use std::io::{BufRead, Write};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::client::{FlowBoards, TicketQuery};
use crate::error::{FbError, Result, ResultExt};
use crate::prompt;
use crate::resolve::{self, BinSelector};
use crate::state::{BinContext, Checkout, CheckoutRecord, StateStore};
use crate::types::Ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    CheckedOut(CheckoutRecord),
    /// The bin had no tickets for the user; state was left alone.
    NoCandidates { bin: String },
}

pub struct CheckoutManager<'a, A> {
    api: &'a A,
    store: &'a StateStore,
}

impl<'a, A: FlowBoards> CheckoutManager<'a, A> {
    pub fn new(api: &'a A, store: &'a StateStore) -> Self {
        Self { api, store }
    }

    /// Lists the user's tickets in a bin and checks out the one picked from
    /// `input`. With `force`, an existing checkout is replaced.
    pub async fn checkout_bin<R: BufRead, W: Write>(
        &self,
        selector: &BinSelector,
        force: bool,
        input: &mut R,
        output: &mut W,
    ) -> Result<CheckoutOutcome> {
        ensure_available(self.store, force, true)?;

        let user = self.api.current_user().await?;
        let bin_id = resolve::resolve_bin(self.api, selector)
            .await
            .context("failed to resolve bin")?;
        let query = TicketQuery {
            bin_id: Some(bin_id.clone()),
            ..TicketQuery::for_user(&user.id)
        };
        let tickets = self.api.search_tickets(&query).await?;
        debug!(bin_id = %bin_id, count = tickets.len(), "tickets in bin");

        if tickets.is_empty() {
            return Ok(CheckoutOutcome::NoCandidates {
                bin: selector.text().to_string(),
            });
        }

        writeln!(output, "Tickets in bin '{}':", selector.text())?;
        prompt::print_numbered(output, &tickets)?;
        let ticket = prompt::select_ticket(input, output, &tickets, "Select ticket to checkout")?;

        let mut record = new_record(ticket);
        if record.bin_id.is_empty() {
            record.bin_id = bin_id.clone();
        }
        if record.bin_name.is_empty() {
            record.bin_name = selector.text().to_string();
        }

        self.store.save_checkout(&record)?;
        self.store.save_bin_context(&BinContext {
            bin_id,
            bin_name: selector.text().to_string(),
        })?;
        info!(ticket_id = %record.ticket_id, "checked out ticket");

        Ok(CheckoutOutcome::CheckedOut(record))
    }

    /// Checks out a ticket by ID after confirming it is assigned to the user.
    /// Never replaces an existing checkout and leaves the bin context alone.
    pub async fn checkout_ticket(&self, ticket_id: &str) -> Result<CheckoutRecord> {
        ensure_available(self.store, false, false)?;

        let user = self.api.current_user().await?;
        let tickets = self
            .api
            .search_tickets(&TicketQuery::for_user(&user.id))
            .await
            .context("failed to validate ticket")?;

        let ticket = tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| FbError::TicketNotFound(ticket_id.to_string()))?;
        if ticket.is_assigned_to(&user.id) == Some(false) {
            return Err(FbError::TicketNotAssigned(ticket_id.to_string()));
        }

        let record = new_record(ticket);
        self.store.save_checkout(&record)?;
        info!(ticket_id = %record.ticket_id, "checked out ticket");
        Ok(record)
    }

    /// Repeats the bin checkout with the bin used last time. Never replaces
    /// an existing checkout; `--force` needs an explicit bin.
    pub async fn checkout_last_bin<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<CheckoutOutcome> {
        let context = self.store.load_bin_context().ok_or(FbError::NoBinContext)?;
        ensure_available(self.store, false, false)?;

        let selector = last_bin_selector(&context);
        debug!(?selector, "reusing last bin");
        self.checkout_bin(&selector, false, input, output).await
    }
}

/// Fails with a conflict when a ticket is already checked out and `force`
/// does not apply.
pub fn ensure_available(store: &StateStore, force: bool, force_allowed: bool) -> Result<()> {
    match store.load_checkout() {
        Checkout::CheckedOut(record) if !(force && force_allowed) => {
            Err(FbError::AlreadyCheckedOut {
                ticket_id: record.ticket_id,
                ticket_name: record.ticket_name,
                force_allowed,
            })
        }
        Checkout::CheckedOut(record) => {
            debug!(ticket_id = %record.ticket_id, "replacing checkout");
            Ok(())
        }
        Checkout::Empty => Ok(()),
    }
}

pub fn checked_out_ticket(store: &StateStore) -> Result<CheckoutRecord> {
    match store.load_checkout() {
        Checkout::CheckedOut(record) => Ok(record),
        Checkout::Empty => Err(FbError::NothingCheckedOut),
    }
}

/// Removes the checkout. Returns whether one was present.
pub fn clear(store: &StateStore) -> Result<bool> {
    let cleared = store.clear_checkout()?;
    debug!(cleared, "cleared checkout");
    Ok(cleared)
}

/// A bin typed by ID is replayed as an ID; anything else is looked up by name
/// again so renamed bins still resolve.
fn last_bin_selector(context: &BinContext) -> BinSelector {
    if context.bin_name.is_empty() || context.bin_name == context.bin_id {
        BinSelector::Id(context.bin_id.clone())
    } else {
        BinSelector::Name(context.bin_name.clone())
    }
}

fn new_record(ticket: &Ticket) -> CheckoutRecord {
    CheckoutRecord {
        ticket_id: ticket.id.clone(),
        ticket_name: ticket.name.clone(),
        bin_id: ticket.bin_id.clone(),
        bin_name: ticket.bin_name.clone(),
        checked_out_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}
