use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::resolve::BinSelector;

#[derive(Parser)]
#[command(name = "fb")]
#[command(about = "A CLI for Flow Boards tickets", version)]
#[command(after_help = "EXAMPLES:
    fb                              List tickets assigned to you
    fb --bin \"In Progress\"          List your tickets in a bin
    fb checkout --bin Doing         Pick a ticket from a bin to work on
    fb -c \"Started on this\"         Comment on the checked-out ticket
    fb clear                        Release the checked-out ticket")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub bin: BinArgs,

    /// Filter by board ID or name
    #[arg(long)]
    pub board: Option<String>,

    /// List all bins
    #[arg(long, conflicts_with_all = ["list_boards", "comment", "quick_comment", "show_checkout"])]
    pub list_bins: bool,

    /// List all boards
    #[arg(long, conflicts_with_all = ["comment", "quick_comment", "show_checkout"])]
    pub list_boards: bool,

    /// Pick a ticket and add a comment interactively
    #[arg(long, conflicts_with_all = ["quick_comment", "show_checkout"])]
    pub comment: bool,

    /// Comment on the checked-out ticket
    #[arg(
        short = 'c',
        value_name = "TEXT",
        conflicts_with_all = ["show_checkout", "board", "bin", "bin_id", "bin_name"]
    )]
    pub quick_comment: Option<String>,

    /// Show the checked-out ticket
    #[arg(short = 'o')]
    pub show_checkout: bool,

    /// Comment text for the checked-out ticket, as bare words
    #[arg(
        value_name = "MESSAGE",
        conflicts_with_all = ["comment", "quick_comment", "show_checkout", "list_bins", "list_boards", "board", "bin", "bin_id", "bin_name"]
    )]
    pub message: Vec<String>,

    /// Log API calls and timings to stderr
    #[arg(long, short, global = true, visible_alias = "debug")]
    pub verbose: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,
}

/// Bin selection shared by listing, `--comment` and `checkout`.
#[derive(Args, Clone, Debug, Default)]
pub struct BinArgs {
    /// Bin ID or name (names made only of letters and digits are taken as IDs)
    #[arg(long, conflicts_with_all = ["bin_id", "bin_name"])]
    pub bin: Option<String>,

    /// Bin ID, used as given
    #[arg(long, conflicts_with = "bin_name")]
    pub bin_id: Option<String>,

    /// Bin name, always looked up
    #[arg(long)]
    pub bin_name: Option<String>,
}

impl BinArgs {
    pub fn selector(&self) -> Option<BinSelector> {
        BinSelector::from_flags(
            self.bin.as_deref(),
            self.bin_id.as_deref(),
            self.bin_name.as_deref(),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check out a ticket to work on
    #[command(after_help = "EXAMPLES:
    fb checkout --bin \"In Progress\"    Pick from a bin
    fb checkout                        Pick from the last bin again
    fb checkout yL4rjYNU5PMlu7K8B      Check out a ticket by ID
    fb checkout --bin Doing --force    Replace the current checkout")]
    Checkout(CheckoutArgs),
    /// Release the checked-out ticket
    Clear,
    /// Show the checked-out ticket
    Status,
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    fb init")]
    Init,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    fb completions bash > ~/.bash_completion.d/fb
    fb completions zsh > ~/.zfunc/_fb
    fb completions fish > ~/.config/fish/completions/fb.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Ticket ID to check out directly
    #[arg(conflicts_with_all = ["bin", "bin_id", "bin_name", "force"])]
    pub ticket_id: Option<String>,

    #[command(flatten)]
    pub bin: BinArgs,

    /// Replace an existing checkout (only with --bin, --bin-id or --bin-name)
    #[arg(long)]
    pub force: bool,
}
