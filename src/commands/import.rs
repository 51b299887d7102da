use std::path::PathBuf;

use anyhow::Result;
use dialoguer::Confirm;
use eventdesk_core::config::AppConfig;
use eventdesk_core::import::{FileCandidate, ImportController};
use eventdesk_core::listing::EventListing;

use crate::client::Client;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(client: &Client, config: &AppConfig, files: Vec<PathBuf>, yes: bool) -> Result<()> {
    let mut import = ImportController::new(config.multi_file_policy);
    import.open();

    let candidates = files
        .iter()
        .map(|path| FileCandidate::new(path.display().to_string()))
        .collect();

    let ticket = match import.accept_files(candidates) {
        Ok(ticket) => ticket,
        Err(e) => {
            eprintln!("{}", e.render());
            anyhow::bail!("Nothing imported");
        }
    };

    // accept_files only hands out a ticket for the first file
    let Some(path) = files.first() else {
        anyhow::bail!("Nothing imported");
    };
    let content = tokio::fs::read_to_string(path).await;
    import.finish_read(ticket, content);

    if let Some(reason) = import.rejection() {
        eprintln!("{}", reason.render());
        anyhow::bail!("Nothing imported");
    }

    let Some(batch) = import.batch() else {
        anyhow::bail!("Nothing imported");
    };
    println!("{}", batch.render());

    // Confirm unless --yes
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Submit this batch?")
            .default(true)
            .interact()?;

        if !confirmed {
            import.close();
            return Ok(());
        }
    }

    let report = tui::with_spinner("Importing events...", import.submit(client)).await?;
    let Some(report) = report else {
        return Ok(());
    };

    println!("{}", report.effect.notification.render());

    let mut listing = EventListing::new();
    super::refresh_after(&mut listing, &report.effect, client).await;

    if !report.effect.close_dialog {
        import.close();
        anyhow::bail!("Batch was not imported");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use eventdesk_core::batch::sample_template_json;
    use eventdesk_core::config::MultiFilePolicy;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn backend(batch_response: Value, batches: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/api/create-events-batch/",
                post(move || {
                    let batches = batches.clone();
                    let response = batch_response.clone();
                    async move {
                        batches.fetch_add(1, Ordering::SeqCst);
                        Json(response)
                    }
                }),
            )
            .route(
                "/api/get-events/",
                get(|| async { Json(json!({"data": [], "error": null})) }),
            )
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn valid_file_is_submitted() {
        let batches = Arc::new(AtomicUsize::new(0));
        let client = crate::client::serve(backend(
            json!({"data": {"added_count": 3, "failed_count": 0}, "error": null}),
            batches.clone(),
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "batch.json", &sample_template_json().unwrap());

        run(&client, &AppConfig::default(), vec![path], true).await.unwrap();
        assert_eq!(batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn nothing_added_is_an_error() {
        let batches = Arc::new(AtomicUsize::new(0));
        let client = crate::client::serve(backend(
            json!({
                "data": {"added_count": 0, "failed_count": 3},
                "error": {"code": "batch", "detail": "No records added"}
            }),
            batches.clone(),
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "batch.json", &sample_template_json().unwrap());

        assert!(run(&client, &AppConfig::default(), vec![path], true).await.is_err());
        assert_eq!(batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_file_is_never_sent() {
        let batches = Arc::new(AtomicUsize::new(0));
        let client = crate::client::serve(backend(json!({}), batches.clone())).await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "batch.json", "{\"batch_id\": \"B-1\", \"records\": []}");

        assert!(run(&client, &AppConfig::default(), vec![path], true).await.is_err());
        assert_eq!(batches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn several_files_follow_the_policy() {
        let batches = Arc::new(AtomicUsize::new(0));
        let client = crate::client::serve(backend(
            json!({"data": {"added_count": 3, "failed_count": 0}, "error": null}),
            batches.clone(),
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(&dir, "first.json", &sample_template_json().unwrap());
        let second = write_file(&dir, "second.json", "not json");

        let reject = AppConfig::default();
        assert!(
            run(&client, &reject, vec![first.clone(), second.clone()], true)
                .await
                .is_err()
        );
        assert_eq!(batches.load(Ordering::SeqCst), 0);

        let take_first = AppConfig {
            multi_file_policy: MultiFilePolicy::TakeFirst,
            ..Default::default()
        };
        run(&client, &take_first, vec![first, second], true).await.unwrap();
        assert_eq!(batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let batches = Arc::new(AtomicUsize::new(0));
        let client = crate::client::serve(backend(json!({}), batches.clone())).await;
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("absent.json");
        assert!(run(&client, &AppConfig::default(), vec![path], true).await.is_err());
        assert_eq!(batches.load(Ordering::SeqCst), 0);
    }
}
