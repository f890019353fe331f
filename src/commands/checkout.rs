use std::io::{BufRead, Write};

use crate::checkout::{self, CheckoutManager, CheckoutOutcome};
use crate::cli::CheckoutArgs;
use crate::client::FlowBoards;
use crate::error::{FbError, Result};
use crate::output;
use crate::state::StateStore;

/// Rejects a checkout that is bound to fail before any network traffic.
pub fn precheck(store: &StateStore, args: &CheckoutArgs) -> Result<()> {
    let repeats_last_bin = args.ticket_id.is_none() && args.bin.selector().is_none();
    if repeats_last_bin && store.load_bin_context().is_none() {
        return Err(FbError::NoBinContext);
    }
    let force_allowed = args.ticket_id.is_none() && !repeats_last_bin;
    checkout::ensure_available(store, args.force, force_allowed)
}

pub async fn run<A: FlowBoards, R: BufRead, W: Write>(
    api: &A,
    store: &StateStore,
    args: &CheckoutArgs,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let manager = CheckoutManager::new(api, store);

    let outcome = match (&args.ticket_id, args.bin.selector()) {
        (Some(ticket_id), _) => CheckoutOutcome::CheckedOut(manager.checkout_ticket(ticket_id).await?),
        (None, Some(selector)) => {
            manager
                .checkout_bin(&selector, args.force, input, output)
                .await?
        }
        (None, None) => manager.checkout_last_bin(input, output).await?,
    };

    match outcome {
        CheckoutOutcome::CheckedOut(record) => output::print_message(&format!(
            "✓ Checked out: {} [{}]",
            record.ticket_name, record.ticket_id
        )),
        CheckoutOutcome::NoCandidates { bin } => {
            output::print_message(&format!("No tickets found in bin '{bin}'"))
        }
    }
    Ok(())
}

pub fn clear(store: &StateStore) -> Result<()> {
    if checkout::clear(store)? {
        output::print_message("✓ Checkout cleared");
    } else {
        output::print_message("No ticket checked out.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BinArgs;
    use crate::state::{BinContext, CheckoutRecord};

    fn args(ticket_id: Option<&str>, bin: Option<&str>, force: bool) -> CheckoutArgs {
        CheckoutArgs {
            ticket_id: ticket_id.map(str::to_string),
            bin: BinArgs {
                bin: bin.map(str::to_string),
                ..Default::default()
            },
            force,
        }
    }

    #[test]
    fn test_precheck_needs_bin_context_to_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        let err = precheck(&store, &args(None, None, false)).unwrap_err();
        assert!(matches!(err, FbError::NoBinContext));

        store
            .save_bin_context(&BinContext {
                bin_id: "bin-doing".to_string(),
                bin_name: "Doing".to_string(),
            })
            .unwrap();
        precheck(&store, &args(None, None, false)).unwrap();
    }

    #[test]
    fn test_precheck_force_only_applies_to_bin_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        store
            .save_checkout(&CheckoutRecord {
                ticket_id: "T1".to_string(),
                ticket_name: "Fix login".to_string(),
                bin_id: "bin-doing".to_string(),
                bin_name: "Doing".to_string(),
                checked_out_at: "2026-10-19T09:30:00Z".to_string(),
            })
            .unwrap();

        assert!(precheck(&store, &args(None, Some("Doing"), false)).is_err());
        precheck(&store, &args(None, Some("Doing"), true)).unwrap();
        assert!(matches!(
            precheck(&store, &args(Some("T2"), None, false)),
            Err(FbError::AlreadyCheckedOut { force_allowed: false, .. })
        ));

        store
            .save_bin_context(&BinContext {
                bin_id: "bin-doing".to_string(),
                bin_name: "Doing".to_string(),
            })
            .unwrap();
        let err = precheck(&store, &args(None, None, true)).unwrap_err();
        assert!(matches!(err, FbError::AlreadyCheckedOut { force_allowed: false, .. }));
        assert!(err.to_string().ends_with("Use 'fb clear' first"));
    }
}
