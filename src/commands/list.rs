use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::render::{pluralize, render_table};

pub async fn run(client: &Client) -> Result<()> {
    let listing = super::load_listing(client).await?;

    if listing.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let rows = listing.rows(&Local);
    println!("{}", render_table(&rows));
    println!();
    println!(
        "{}",
        format!("{} {}", rows.len(), pluralize("event", rows.len())).dimmed()
    );

    Ok(())
}
