pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod import;
pub mod list;
pub mod template;

use anyhow::Result;
use clap::Args;
use clap::builder::PossibleValuesParser;
use dialoguer::{Confirm, Input, Select};
use eventdesk_core::event::LOCATION_CODES;
use eventdesk_core::form::{EventForm, FormError, FormField};
use eventdesk_core::listing::{EventListing, RefreshResult};
use eventdesk_core::notify::ActionOutcome;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::render::{Render, pluralize};
use crate::utils::tui;

/// Event fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Transaction ID (UUID)
    #[arg(long)]
    pub trans_id: Option<String>,

    #[arg(long)]
    pub client_id: Option<String>,

    /// Local date/time (e.g., "2024-09-14T10:20")
    #[arg(long)]
    pub timestamp: Option<String>,

    #[arg(long)]
    pub rc_num: Option<String>,

    /// Event count (at least 1)
    #[arg(long)]
    pub count: Option<String>,

    #[arg(long, value_parser = PossibleValuesParser::new(LOCATION_CODES.iter().copied()))]
    pub location: Option<String>,

    /// Address number
    #[arg(long)]
    pub addr: Option<String>,

    #[arg(long)]
    pub location_id1: Option<String>,

    #[arg(long)]
    pub location_id2: Option<String>,
}

impl EventFields {
    pub fn value(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::TransId => &self.trans_id,
            FormField::ClientId => &self.client_id,
            FormField::TransTms => &self.timestamp,
            FormField::RcNum => &self.rc_num,
            FormField::EventCnt => &self.count,
            FormField::LocationCd => &self.location,
            FormField::AddrNbr => &self.addr,
            FormField::LocationId1 => &self.location_id1,
            FormField::LocationId2 => &self.location_id2,
        };
        value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.value(*field).is_none())
    }

    /// Feed every given flag into `form` as a change.
    pub fn apply(&self, form: &mut EventForm) {
        for field in FormField::ALL {
            if let Some(value) = self.value(field) {
                form.set(field, value);
            }
        }
    }
}

/// Prompt for one field, offering the form's current value as the default.
pub fn prompt_field(form: &mut EventForm, field: FormField) -> Result<()> {
    let current = form.values().get(field).to_string();
    let label = field.label();

    let value = if field == FormField::LocationCd {
        let default = LOCATION_CODES
            .iter()
            .position(|code| *code == current)
            .unwrap_or(0);
        let index = Select::new()
            .with_prompt(format!("  {label}"))
            .items(LOCATION_CODES)
            .default(default)
            .interact()?;
        LOCATION_CODES[index].to_string()
    } else {
        let prompt = if field.is_required() {
            format!("  {label}")
        } else {
            format!("  {label} (skip)")
        };
        Input::<String>::new()
            .with_prompt(prompt)
            .default(current.clone())
            .show_default(!current.is_empty())
            .allow_empty(!field.is_required())
            .interact_text()?
    };

    form.set(field, value);
    Ok(())
}

pub async fn load_listing(client: &Client) -> Result<EventListing> {
    let mut listing = EventListing::new();
    match tui::with_spinner("Loading events...", listing.refresh(client)).await {
        RefreshResult::Failed(notification) => anyhow::bail!("{}", notification.message),
        RefreshResult::Loaded(_) | RefreshResult::Discarded => Ok(listing),
    }
}

/// Reload the listing if `outcome` asks for it and say how many events remain.
pub async fn refresh_after(listing: &mut EventListing, outcome: &ActionOutcome, client: &Client) {
    match tui::with_spinner("Refreshing events...", listing.apply(outcome, client)).await {
        Some(RefreshResult::Loaded(count)) => {
            let line = format!("{count} {} on record", pluralize("event", count));
            println!("{}", line.dimmed());
        }
        Some(RefreshResult::Failed(notification)) => println!("{}", notification.render()),
        Some(RefreshResult::Discarded) | None => {}
    }
}

/// Submit `form`, re-prompting in interactive mode until it goes through or
/// the user gives up.
pub async fn submit_form(
    client: &Client,
    listing: &mut EventListing,
    mut form: EventForm,
    interactive: bool,
) -> Result<()> {
    let message = if form.is_add() {
        "Adding event..."
    } else {
        "Updating event..."
    };

    loop {
        let retry: Vec<FormField> = match tui::with_spinner(message, form.submit(client)).await {
            Ok(Some(outcome)) => {
                println!("{}", outcome.notification.render());
                if outcome.close_dialog {
                    refresh_after(listing, &outcome, client).await;
                    return Ok(());
                }
                if !interactive || !confirm_retry()? {
                    anyhow::bail!("Event was not saved");
                }
                FormField::ALL.to_vec()
            }
            Ok(None) => return Ok(()),
            Err(FormError::NoFieldsChanged) => {
                anyhow::bail!("{}", FormError::NoFieldsChanged);
            }
            Err(FormError::Invalid(errors)) => {
                eprintln!("{}", errors.render());
                if !interactive {
                    anyhow::bail!("Event was not saved");
                }
                errors
                    .iter()
                    .filter_map(|(name, _)| FormField::from_name(name))
                    .collect()
            }
            Err(e) => return Err(e.into()),
        };

        for field in retry {
            prompt_field(&mut form, field)?;
        }
    }
}

fn confirm_retry() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Edit the fields and try again?")
        .default(true)
        .interact()?)
}
