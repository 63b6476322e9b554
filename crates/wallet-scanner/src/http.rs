//! Shared HTTP plumbing for the API clients

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Result, ScannerError};

const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Build a client whose every request is bounded by `timeout`
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("wallet-scanner/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ScannerError::Network)
}

/// GET `url` and decode the JSON body, retrying once on a transient failure
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    match fetch(client, service, url, query).await {
        Err(e) if e.is_retryable() => {
            warn!(service, error = %e, "transient failure, retrying once");
            tokio::time::sleep(RETRY_DELAY).await;
            fetch(client, service, url, query).await
        }
        other => other,
    }
}

async fn fetch<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    debug!(service, url, "GET");

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| ScannerError::from_transport(service, e.without_url()))?;

    let status = response.status();
    if !status.is_success() {
        let reason = response
            .text()
            .await
            .ok()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        return Err(ScannerError::Upstream {
            service,
            status: status.as_u16(),
            reason: truncate(&reason, 200),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ScannerError::from_transport(service, e.without_url()))?;

    serde_json::from_slice(&body).map_err(|e| ScannerError::Malformed {
        service,
        reason: e.to_string(),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
