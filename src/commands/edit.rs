use anyhow::Result;
use chrono::Local;
use eventdesk_core::form::FormField;
use owo_colors::OwoColorize;

use super::EventFields;
use crate::client::Client;

pub async fn run(client: &Client, event_id: &str, fields: EventFields) -> Result<()> {
    let mut listing = super::load_listing(client).await?;

    let Some(mut form) = listing.edit(event_id, Local) else {
        anyhow::bail!("Event '{}' not found", event_id);
    };

    if let Some(event) = listing.find(event_id) {
        println!("{}", event.to_string().bold());
    }

    // Without flags every field is offered, pre-filled with its stored value.
    let interactive = fields.is_empty();
    if interactive {
        for field in FormField::ALL {
            super::prompt_field(&mut form, field)?;
        }
        println!();
    } else {
        fields.apply(&mut form);
    }

    let changed: Vec<_> = form.changed_fields().into_iter().map(FormField::label).collect();
    if !changed.is_empty() {
        println!("{}", format!("Changing: {}", changed.join(", ")).dimmed());
    }

    super::submit_form(client, &mut listing, form, interactive).await
}
