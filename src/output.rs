use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

/// Global output format setting
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
    } else {
        display(item);
    }
}

/// Print a message, wrapped in a JSON object in JSON mode
pub fn print_message(message: &str) {
    if is_json_output() {
        println!("{}", serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

/// Format a bin name with a color guessed from the name
pub fn status_colored(status: &str) -> String {
    let lower = status.to_lowercase();
    if lower.contains("done") || lower.contains("complete") || lower.contains("closed") {
        status.green().to_string()
    } else if lower.contains("doing") || lower.contains("progress") || lower.contains("started") {
        status.blue().to_string()
    } else if lower.contains("review") {
        status.magenta().to_string()
    } else if lower.contains("blocked") || lower.contains("canceled") || lower.contains("cancelled") {
        status.red().to_string()
    } else if lower.contains("backlog") || lower.contains("todo") {
        status.bright_black().to_string()
    } else {
        status.to_string()
    }
}

pub fn format_date_only(date: Option<&DateTime<Utc>>) -> String {
    date.map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Format a relative time (e.g., "2 days ago")
pub fn format_relative(iso: &str) -> String {
    format_relative_to(iso, Utc::now())
}

fn format_relative_to(iso: &str, now: DateTime<Utc>) -> String {
    let Ok(dt) = iso.parse::<DateTime<Utc>>() else {
        return iso.split('T').next().unwrap_or(iso).to_string();
    };
    let diff = now.signed_duration_since(dt);

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        let mins = diff.num_minutes();
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff.num_hours() < 24 {
        let hours = diff.num_hours();
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff.num_days() < 30 {
        let days = diff.num_days();
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_date_only(Some(&dt))
    }
}

/// Truncate a string with ellipsis, counting characters
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
