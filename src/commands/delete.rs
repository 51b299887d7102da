use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(client: &Client, event_id: &str, force: bool) -> Result<()> {
    let mut listing = super::load_listing(client).await?;

    let Some(mut gate) = listing.request_delete(event_id) else {
        anyhow::bail!("Event '{}' not found", event_id);
    };

    if let Some(event) = gate.subject() {
        println!("{}", event.to_string().bold());
    }

    // Confirm unless --force
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(gate.prompt())
            .default(false)
            .interact()?;

        if !confirmed {
            gate.cancel();
        }
    }

    let Some(outcome) =
        tui::with_spinner("Deleting event...", listing.delete(&mut gate, client)).await
    else {
        println!("{}", "Nothing deleted".dimmed());
        return Ok(());
    };

    println!("{}", outcome.notification.render());
    super::refresh_after(&mut listing, &outcome, client).await;

    if !outcome.refresh_listing {
        anyhow::bail!("Event was not deleted");
    }

    Ok(())
}
