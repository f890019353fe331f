use tabled::Tabled;

use crate::client::FlowBoards;
use crate::error::Result;
use crate::output;
use crate::types::{Bin, Board};

#[derive(Tabled)]
struct BinRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Bin> for BinRow {
    fn from(bin: &Bin) -> Self {
        Self {
            name: output::status_colored(&bin.name),
            id: bin.id.clone(),
        }
    }
}

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Bins")]
    bins: usize,
}

impl From<&Board> for BoardRow {
    fn from(board: &Board) -> Self {
        Self {
            name: board.name.clone(),
            id: board.id.clone(),
            bins: board.bins.len(),
        }
    }
}

pub async fn list_bins<A: FlowBoards>(api: &A) -> Result<()> {
    let bins = api.bins().await?;

    if bins.is_empty() {
        output::print_message("No bins found.");
        return Ok(());
    }

    output::print_table(&bins, |b| BinRow::from(b));
    Ok(())
}

pub async fn list_boards<A: FlowBoards>(api: &A) -> Result<()> {
    let boards = api.boards().await?;

    if boards.is_empty() {
        output::print_message("No boards found.");
        return Ok(());
    }

    output::print_table(&boards, |b| BoardRow::from(b));
    Ok(())
}
