//! Colored terminal rendering for eventdesk types.

use eventdesk_core::batch::{BatchError, BatchRequest};
use eventdesk_core::form::FormField;
use eventdesk_core::import::ImportError;
use eventdesk_core::listing::EventRow;
use eventdesk_core::notify::{Notification, Severity};
use eventdesk_core::validation::FieldErrors;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Notification {
    fn render(&self) -> String {
        match self.severity {
            Severity::Success => format!("{} {}", "✓".green(), self.message.green()),
            Severity::Info => self.message.dimmed().to_string(),
            Severity::Warning => format!("{} {}", "!".yellow(), self.message.yellow()),
            Severity::Error => format!("{} {}", "✗".red(), self.message.red()),
        }
    }
}

fn field_label(name: &str) -> &str {
    FormField::from_name(name).map(FormField::label).unwrap_or(name)
}

impl Render for FieldErrors {
    fn render(&self) -> String {
        self.iter()
            .map(|(field, message)| {
                if field == "form" {
                    format!("   {}", message.red())
                } else {
                    format!("   {} {}", format!("{}:", field_label(field)).bold(), message.red())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for ImportError {
    fn render(&self) -> String {
        match self {
            ImportError::Batch(BatchError::Structure(issues)) => {
                let mut lines = vec![format!(
                    "{} {}",
                    "✗".red(),
                    format!("Batch file has {} {}", issues.len(), pluralize("problem", issues.len())).red()
                )];
                lines.extend(issues.iter().map(|issue| {
                    format!("   {} {}", issue.path.dimmed(), issue.message)
                }));
                lines.join("\n")
            }
            other => format!("{} {}", "✗".red(), other.to_string().red()),
        }
    }
}

impl Render for BatchRequest {
    fn render(&self) -> String {
        let groups = self.records.len();
        let events = self.event_count();
        format!(
            "📦 {} {}",
            self.batch_id.bold(),
            format!(
                "({} {} in {} transaction {})",
                events,
                pluralize("event", events),
                groups,
                pluralize("group", groups)
            )
            .dimmed()
        )
    }
}

const TABLE_HEADERS: [&str; 9] = [
    "#",
    "Event ID",
    "Transaction ID",
    "Client ID",
    "Timestamp",
    "RC Number",
    "Event Count",
    "Location Code",
    "Address Number",
];

fn row_cells(row: &EventRow) -> [String; 9] {
    [
        row.index.to_string(),
        row.event_id.clone(),
        row.trans_id.clone(),
        row.client_id.clone(),
        row.timestamp.clone(),
        row.rc_num.clone(),
        row.event_cnt.to_string(),
        row.location_cd.clone(),
        row.addr_nbr.clone(),
    ]
}

/// Render the event table with padded columns.
pub fn render_table(rows: &[EventRow]) -> String {
    let cells: Vec<[String; 9]> = rows.iter().map(row_cells).collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    // Pad before coloring; escape codes would throw the widths off.
    let header = TABLE_HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}").bold().to_string())
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![header];
    for row in &cells {
        let line = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = format!("{cell:<w$}");
                if i == 0 {
                    padded.dimmed().to_string()
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
