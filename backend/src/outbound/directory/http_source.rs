//! Reqwest-backed record source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP status mapping, and JSON decoding. It targets a JSONPlaceholder-style
//! directory where users live at `/users/{id}` and each user document embeds
//! its address, so address lookups read the same resource.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::dto::{DirectoryEntryDto, into_ids};
use crate::domain::ports::{RecordKind, RecordSource, RecordSourceError};

const DEFAULT_USER_AGENT: &str = "user-enrichment/0.1";
const USERS_COLLECTION: &str = "users";

/// Record source adapter performing HTTP GET requests against one directory.
pub struct HttpRecordSource {
    client: Client,
    base_url: Url,
}

impl HttpRecordSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = HttpRecordSource::new(base_url, Duration::from_secs(10))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RecordSourceError> {
        debug!(%url, "requesting directory resource");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            RecordSourceError::decode(format!("invalid directory JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, kind: RecordKind, id: i64) -> Result<Value, RecordSourceError> {
        let url = record_url(&self.base_url, kind, id)?;
        self.get_json(url).await
    }

    async fn list_ids(&self, kind: RecordKind) -> Result<Vec<i64>, RecordSourceError> {
        let url = collection_url(&self.base_url, kind)?;
        let entries: Vec<DirectoryEntryDto> = self.get_json(url).await?;
        Ok(into_ids(entries))
    }
}

/// Addresses are embedded in user documents upstream.
fn collection_segment(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::User | RecordKind::Address => USERS_COLLECTION,
    }
}

fn collection_url(base_url: &Url, kind: RecordKind) -> Result<Url, RecordSourceError> {
    build_url(base_url, &[collection_segment(kind)])
}

fn record_url(base_url: &Url, kind: RecordKind, id: i64) -> Result<Url, RecordSourceError> {
    build_url(base_url, &[collection_segment(kind), &id.to_string()])
}

fn build_url(base_url: &Url, segments: &[&str]) -> Result<Url, RecordSourceError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            RecordSourceError::invalid_request(format!("base URL {base_url} cannot carry a path"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> RecordSourceError {
    if error.is_timeout() {
        RecordSourceError::timeout(error.to_string())
    } else {
        RecordSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RecordSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => RecordSourceError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RecordSourceError::timeout(message)
        }
        _ if status.is_client_error() => RecordSourceError::invalid_request(message),
        _ => RecordSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
