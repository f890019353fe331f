use crate::error::Result;
use crate::output::{self, format_relative};
use crate::state::{Checkout, StateStore};

pub fn render(checkout: &Checkout) -> String {
    match checkout {
        Checkout::Empty => "No ticket checked out.".to_string(),
        Checkout::CheckedOut(record) => {
            let bin = if record.bin_name.is_empty() {
                &record.bin_id
            } else {
                &record.bin_name
            };
            format!(
                "Checked out: {} [{}]\nBin: {}\nSince: {}",
                record.ticket_name,
                record.ticket_id,
                bin,
                format_relative(&record.checked_out_at)
            )
        }
    }
}

pub fn show(store: &StateStore) -> Result<()> {
    let checkout = store.load_checkout();
    match checkout.record() {
        Some(record) => output::print_item(record, |_| println!("{}", render(&checkout))),
        None => output::print_message(&render(&checkout)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CheckoutRecord;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Checkout::Empty), "No ticket checked out.");
    }

    #[test]
    fn test_render_record() {
        let checkout = Checkout::CheckedOut(CheckoutRecord {
            ticket_id: "T1".to_string(),
            ticket_name: "Fix login".to_string(),
            bin_id: "bin-doing".to_string(),
            bin_name: String::new(),
            checked_out_at: "2026-01-02T08:00:00Z".to_string(),
        });

        let text = render(&checkout);
        assert!(text.starts_with("Checked out: Fix login [T1]\nBin: bin-doing\nSince: "));
    }
}
