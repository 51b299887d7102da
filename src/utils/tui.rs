use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run `task` behind a spinner, clearing it once the task resolves.
pub async fn with_spinner<F: Future>(message: impl Into<String>, task: F) -> F::Output {
    let spinner = create_spinner(message);
    let output = task.await;
    spinner.finish_and_clear();
    output
}
