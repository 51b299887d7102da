use anyhow::Result;
use eventdesk_core::form::{EventForm, FormField};
use eventdesk_core::listing::EventListing;

use super::EventFields;
use crate::client::Client;

pub async fn run(client: &Client, fields: EventFields) -> Result<()> {
    let mut form = EventForm::add_local();
    fields.apply(&mut form);

    // Prompt only when a required flag is missing.
    let interactive = FormField::ALL
        .into_iter()
        .any(|field| field.is_required() && fields.value(field).is_none());

    if interactive {
        for field in FormField::ALL {
            if fields.value(field).is_none() {
                super::prompt_field(&mut form, field)?;
            }
        }
        println!();
    }

    let mut listing = EventListing::new();
    super::submit_form(client, &mut listing, form, interactive).await
}
