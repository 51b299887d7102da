use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eventdesk_core::batch::sample_template_json;
use owo_colors::OwoColorize;

pub fn run(output: Option<PathBuf>) -> Result<()> {
    let json = sample_template_json()?;

    match output {
        Some(path) => {
            write_template(&path, &json)?;
            println!(
                "{}",
                format!("Wrote sample batch to {}", path.display()).green()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn write_template(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))
}
