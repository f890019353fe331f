//! Turns user-supplied bin and board references into IDs.

use std::future::Future;

use tracing::debug;

use crate::client::{FlowBoards, TicketQuery};
use crate::error::{FbError, Result, ResultExt};
use crate::pagination::CollectionKind;
use crate::types::Named;

/// How a bin was named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinSelector {
    /// `--bin`: classified with [`looks_like_id`].
    Auto(String),
    /// `--bin-id`: used verbatim.
    Id(String),
    /// `--bin-name`: always looked up by name.
    Name(String),
}

impl BinSelector {
    /// Builds a selector from the three mutually exclusive flags, ignoring
    /// empty values.
    pub fn from_flags(
        auto: Option<&str>,
        id: Option<&str>,
        name: Option<&str>,
    ) -> Option<Self> {
        let non_empty =
            |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(str::to_string);

        non_empty(id)
            .map(BinSelector::Id)
            .or_else(|| non_empty(name).map(BinSelector::Name))
            .or_else(|| non_empty(auto).map(BinSelector::Auto))
    }

    /// The text the user typed.
    pub fn text(&self) -> &str {
        match self {
            BinSelector::Auto(text) | BinSelector::Id(text) | BinSelector::Name(text) => text,
        }
    }
}

/// Best-effort classifier: IDs are opaque tokens of letters and digits,
/// while names seen in practice contain spaces or punctuation
/// (`"In Progress"`, `"K+Dev.Doing"`).
///
/// A name made only of letters and digits (`"Backlog"`) is misclassified as
/// an ID and sent to the backend verbatim, where it matches nothing. Use
/// [`BinSelector::Name`] to force a lookup.
pub fn looks_like_id(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(char::is_alphanumeric)
}

/// First item whose name equals `name`, ignoring case.
pub fn find_by_name<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    let wanted = name.to_lowercase();
    items.iter().find(|item| item.name().to_lowercase() == wanted)
}

/// Resolves `candidate` to an ID. ID-looking candidates are returned without
/// calling `fetch`.
pub async fn resolve<T, F, Fut>(kind: CollectionKind, candidate: &str, fetch: F) -> Result<String>
where
    T: Named,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    if looks_like_id(candidate) {
        debug!(kind = kind.label(), candidate, "treating as ID");
        return Ok(candidate.to_string());
    }
    lookup_by_name(kind, candidate, fetch).await
}

async fn lookup_by_name<T, F, Fut>(kind: CollectionKind, name: &str, fetch: F) -> Result<String>
where
    T: Named,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let items = fetch().await?;
    match find_by_name(&items, name) {
        Some(item) => {
            debug!(kind = kind.label(), name, id = item.id(), "resolved name");
            Ok(item.id().to_string())
        }
        None => Err(match kind {
            CollectionKind::Bins => FbError::BinNotFound(name.to_string()),
            CollectionKind::Boards => FbError::BoardNotFound(name.to_string()),
        }),
    }
}

pub async fn resolve_bin<A: FlowBoards>(api: &A, selector: &BinSelector) -> Result<String> {
    match selector {
        BinSelector::Id(id) => Ok(id.clone()),
        BinSelector::Name(name) => lookup_by_name(CollectionKind::Bins, name, || api.bins()).await,
        BinSelector::Auto(candidate) => resolve(CollectionKind::Bins, candidate, || api.bins()).await,
    }
}

pub async fn resolve_board<A: FlowBoards>(api: &A, candidate: &str) -> Result<String> {
    resolve(CollectionKind::Boards, candidate, || api.boards()).await
}

/// Builds the ticket search for `user_id`, resolving the optional bin and
/// board filters first.
pub async fn ticket_query<A: FlowBoards>(
    api: &A,
    user_id: &str,
    bin: Option<&BinSelector>,
    board: Option<&str>,
) -> Result<TicketQuery> {
    let bin_id = match bin {
        Some(selector) => Some(
            resolve_bin(api, selector)
                .await
                .context("failed to resolve bin filter")?,
        ),
        None => None,
    };
    let board_id = match board.filter(|b| !b.trim().is_empty()) {
        Some(candidate) => Some(
            resolve_board(api, candidate)
                .await
                .context("failed to resolve board filter")?,
        ),
        None => None,
    };

    Ok(TicketQuery {
        bin_id,
        board_id,
        ..TicketQuery::for_user(user_id)
    })
}
