mod checkout;
mod cli;
mod client;
mod comment;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod pagination;
mod prompt;
mod resolve;
mod responses;
mod state;
#[cfg(test)]
mod test_support;
mod types;

use std::error::Error;
use std::io;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::info;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    logging::init(verbose);
    output::set_json_output(cli.json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let started = Instant::now();

    // Commands that don't touch local state
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "fb", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Init) => return commands::init::run(),
        _ => {}
    }

    let store = commands::state_store()?;
    match &cli.command {
        Some(Commands::Completions { .. } | Commands::Init) => {
            // Already handled above
        }
        Some(Commands::Status) => return commands::status::show(&store),
        Some(Commands::Clear) => return commands::checkout::clear(&store),
        Some(Commands::Checkout(args)) => {
            commands::checkout::precheck(&store, args)?;
            let api = commands::connect().await?;
            let stdin = io::stdin();
            commands::checkout::run(&api, &store, args, &mut stdin.lock(), &mut io::stdout()).await?;
        }
        None => dispatch_flags(&cli, &store).await?,
    }

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
    Ok(())
}

async fn dispatch_flags(cli: &Cli, store: &state::StateStore) -> Result<()> {
    if cli.show_checkout {
        return commands::status::show(store);
    }

    let quick_text = match (&cli.quick_comment, cli.message.is_empty()) {
        (Some(text), _) => Some(text.clone()),
        (None, false) => Some(cli.message.join(" ")),
        (None, true) => None,
    };
    if let Some(text) = quick_text {
        let record = checkout::checked_out_ticket(store)?;
        let api = commands::connect().await?;
        return commands::comment::quick(&api, &record, &text).await;
    }

    let api = commands::connect().await?;
    let bin = cli.bin.selector();

    if cli.list_bins {
        commands::collections::list_bins(&api).await
    } else if cli.list_boards {
        commands::collections::list_boards(&api).await
    } else if cli.comment {
        let stdin = io::stdin();
        commands::comment::interactive(
            &api,
            bin.as_ref(),
            cli.board.as_deref(),
            &mut stdin.lock(),
            &mut io::stdout(),
        )
        .await
    } else {
        commands::list::run(&api, store, bin.as_ref(), cli.board.as_deref()).await
    }
}
