//! In-memory `FlowBoards` used by the unit tests.

use std::cell::{Cell, RefCell};

use crate::client::{FlowBoards, TicketQuery};
use crate::error::{FbError, Result};
use crate::responses::CommentPayload;
use crate::types::{Bin, Board, Ticket, User};

pub const USER_ID: &str = "u1";

pub fn bin(id: &str, name: &str) -> Bin {
    Bin {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn board(id: &str, name: &str) -> Board {
    Board {
        id: id.to_string(),
        name: name.to_string(),
        bins: Vec::new(),
    }
}

pub fn ticket(id: &str, name: &str, bin_id: &str, bin_name: &str) -> Ticket {
    Ticket {
        id: id.to_string(),
        name: name.to_string(),
        bin_id: bin_id.to_string(),
        bin_name: bin_name.to_string(),
        assigned_ids: vec![USER_ID.to_string()],
        ..Default::default()
    }
}

/// Returns every configured ticket for any search, like deployments that
/// ignore the search filters.
pub struct FakeBoards {
    user: User,
    tickets: Vec<Ticket>,
    bins: Vec<Bin>,
    boards: Vec<Board>,
    search_error: Option<u16>,
    bins_error: Option<u16>,
    searches: RefCell<Vec<TicketQuery>>,
    bin_fetches: Cell<usize>,
    board_fetches: Cell<usize>,
    comments: RefCell<Vec<CommentPayload>>,
}

impl FakeBoards {
    pub fn new() -> Self {
        Self {
            user: User {
                id: USER_ID.to_string(),
                email: "dev@acme.test".to_string(),
                name: "Dev".to_string(),
            },
            tickets: Vec::new(),
            bins: Vec::new(),
            boards: Vec::new(),
            search_error: None,
            bins_error: None,
            searches: RefCell::new(Vec::new()),
            bin_fetches: Cell::new(0),
            board_fetches: Cell::new(0),
            comments: RefCell::new(Vec::new()),
        }
    }

    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    pub fn with_bins(mut self, bins: Vec<Bin>) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_boards(mut self, boards: Vec<Board>) -> Self {
        self.boards = boards;
        self
    }

    /// Makes every ticket search fail with the given HTTP status.
    pub fn failing_search(mut self, status: u16) -> Self {
        self.search_error = Some(status);
        self
    }

    /// Makes every bins fetch fail with the given HTTP status.
    pub fn failing_bins(mut self, status: u16) -> Self {
        self.bins_error = Some(status);
        self
    }

    pub fn searches(&self) -> Vec<TicketQuery> {
        self.searches.borrow().clone()
    }

    pub fn bin_fetches(&self) -> usize {
        self.bin_fetches.get()
    }

    pub fn board_fetches(&self) -> usize {
        self.board_fetches.get()
    }

    pub fn comments(&self) -> Vec<CommentPayload> {
        self.comments.borrow().clone()
    }
}

impl FlowBoards for FakeBoards {
    async fn current_user(&self) -> Result<User> {
        Ok(self.user.clone())
    }

    async fn search_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        self.searches.borrow_mut().push(query.clone());
        if let Some(status) = self.search_error {
            return Err(FbError::ApiError {
                status,
                message: "search unavailable".to_string(),
            });
        }
        Ok(self.tickets.clone())
    }

    async fn bins(&self) -> Result<Vec<Bin>> {
        self.bin_fetches.set(self.bin_fetches.get() + 1);
        if let Some(status) = self.bins_error {
            return Err(FbError::ApiError {
                status,
                message: "bins unavailable".to_string(),
            });
        }
        Ok(self.bins.clone())
    }

    async fn boards(&self) -> Result<Vec<Board>> {
        self.board_fetches.set(self.board_fetches.get() + 1);
        Ok(self.boards.clone())
    }

    async fn post_comment(&self, payload: &CommentPayload) -> Result<()> {
        self.comments.borrow_mut().push(payload.clone());
        Ok(())
    }
}
