//! HTTP client for the events backend.
//!
//! Every endpoint answers with the `{data, error}` envelope, including on
//! non-2xx statuses, so the body is read and decoded before the status is
//! looked at.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use eventdesk_core::api::{ApiError, EventApi};
use eventdesk_core::batch::{BatchRequest, BatchResult};
use eventdesk_core::config::AppConfig;
use eventdesk_core::envelope::Envelope;
use eventdesk_core::event::{Event, EventDraft, EventPatch};

const LIST_PATH: &str = "api/get-events/";
const CREATE_PATH: &str = "api/create-event/";
const BATCH_PATH: &str = "api/create-events-batch/";

/// `EventApi` over HTTP.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.normalized_base_url(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid backend URL: {base_url}"))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("Invalid endpoint {path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "backend request");
        Ok(self.http.request(method, url))
    }

    fn request_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.request(method, path)?.json(body))
    }

    /// Send and decode the envelope. Anything short of a readable envelope is
    /// a transport failure.
    async fn send(&self, request: RequestBuilder) -> Result<Envelope, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "backend unreachable");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(%status, error = %e, "failed to read backend response");
            ApiError::Transport(e.to_string())
        })?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            warn!(%status, error = %e, "backend response is not an envelope");
            ApiError::Transport(format!("HTTP {status}: unreadable response ({e})"))
        })?;

        if !status.is_success() && envelope.error.is_none() && envelope.data.is_none() {
            warn!(%status, "backend failed without an error payload");
            return Err(ApiError::Transport(format!("HTTP {status}")));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl EventApi for Client {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let request = self.request(Method::GET, LIST_PATH)?;
        let events: Option<Vec<Event>> = self.send(request).await?.into_result()?;
        Ok(events.unwrap_or_default())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Option<Event>, ApiError> {
        let request = self.request_json(Method::POST, CREATE_PATH, draft)?;
        self.send(request).await?.into_result()
    }

    async fn create_events_batch(&self, batch: &BatchRequest) -> Result<BatchResult, ApiError> {
        let request = self.request_json(Method::POST, BATCH_PATH, batch)?;
        self.send(request).await?.into_batch_result()
    }

    async fn update_event(
        &self,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<Option<Event>, ApiError> {
        let path = format!("api/update-event/{event_id}/");
        let request = self.request_json(Method::PUT, &path, patch)?;
        self.send(request).await?.into_result()
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), ApiError> {
        let path = format!("api/delete-event/{event_id}/");
        let request = self.request(Method::DELETE, &path)?;
        self.send(request).await?.into_ack()
    }
}

/// A `Client` pointed at `router` served on an ephemeral local port.
#[cfg(test)]
pub(crate) async fn serve(router: axum::Router) -> Client {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Client::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
}
