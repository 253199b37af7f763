//! Client for the draft persistence and publish endpoints.
//!
//! Saving is a `PUT` of the whole draft with its version for the server's
//! optimistic-concurrency check. Publishing is a one-shot `POST` the server
//! applies transactionally, so a document is never observed partially
//! published.

use crate::http::{error_message, transport_error};
use async_trait::async_trait;
use atelier_core::config::EditorConfig;
use atelier_core::error::{EditorError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// One persistence attempt: the draft fields the server stores.
#[derive(Debug, Clone, Copy)]
pub struct SaveRequest<'a> {
    pub title: &'a str,
    pub document_body: &'a str,
    pub version: u64,
}

/// Returned by a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// The externally reachable URL of the published document.
    pub published_url: String,
}

/// Contract the session manager requires from the backing store.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Persists the draft.
    ///
    /// # Errors
    ///
    /// - [`EditorError::SessionExpired`] on 401
    /// - [`EditorError::VersionConflict`] on 409 (another writer saved a
    ///   newer version)
    /// - [`EditorError::ServiceError`] on any other failure
    async fn save(&self, request: SaveRequest<'_>) -> Result<()>;

    /// Atomically transitions the draft to its published URL.
    ///
    /// # Errors
    ///
    /// - [`EditorError::SlugConflict`] on 409
    /// - [`EditorError::ServiceError`] on any other failure
    async fn publish(&self, slug: Option<&str>) -> Result<PublishReceipt>;
}

/// HTTP implementation of [`PersistenceService`].
#[derive(Clone)]
pub struct HttpPersistenceService {
    client: Client,
    endpoint: String,
}

impl HttpPersistenceService {
    /// Creates a client for the given draft endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Creates a client from editor configuration.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.persistence_endpoint.clone())
    }
}

#[async_trait]
impl PersistenceService for HttpPersistenceService {
    async fn save(&self, request: SaveRequest<'_>) -> Result<()> {
        let response = self
            .client
            .put(&self.endpoint)
            .json(&SavePayload::from(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_save_status(status, error_message(&body)))
    }

    async fn publish(&self, slug: Option<&str>) -> Result<PublishReceipt> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PublishPayload {
                action: "publish",
                slug,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_publish_status(status, slug, error_message(&body)));
        }

        let receipt: PublishResponse = response.json().await.map_err(|err| {
            EditorError::internal(format!("Failed to parse publish response: {err}"))
        })?;
        Ok(PublishReceipt {
            published_url: receipt.published_url,
        })
    }
}

fn classify_save_status(status: StatusCode, message: String) -> EditorError {
    match status {
        StatusCode::UNAUTHORIZED => EditorError::SessionExpired,
        StatusCode::CONFLICT => EditorError::VersionConflict,
        s => EditorError::service(s.as_u16(), message),
    }
}

fn classify_publish_status(status: StatusCode, slug: Option<&str>, message: String) -> EditorError {
    match status {
        StatusCode::CONFLICT => EditorError::SlugConflict(slug.unwrap_or_default().to_string()),
        s => EditorError::service(s.as_u16(), message),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavePayload<'a> {
    title: &'a str,
    document_body: &'a str,
    version: u64,
}

impl<'a> From<SaveRequest<'a>> for SavePayload<'a> {
    fn from(request: SaveRequest<'a>) -> Self {
        Self {
            title: request.title,
            document_body: request.document_body,
            version: request.version,
        }
    }
}

#[derive(Serialize)]
struct PublishPayload<'a> {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    published_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_conflict_maps_to_version_conflict() {
        assert_eq!(
            classify_save_status(StatusCode::CONFLICT, "".into()),
            EditorError::VersionConflict
        );
        assert_eq!(
            classify_save_status(StatusCode::UNAUTHORIZED, "".into()),
            EditorError::SessionExpired
        );
        assert!(matches!(
            classify_save_status(StatusCode::INTERNAL_SERVER_ERROR, "".into()),
            EditorError::ServiceError { status: 500, .. }
        ));
    }

    #[test]
    fn publish_conflict_carries_the_slug() {
        assert_eq!(
            classify_publish_status(StatusCode::CONFLICT, Some("my-page"), "".into()),
            EditorError::SlugConflict("my-page".to_string())
        );
    }

    #[test]
    fn save_payload_serializes_camel_case() {
        let payload = SavePayload::from(SaveRequest {
            title: "Landing",
            document_body: "<p>hi</p>",
            version: 7,
        });
        let json = serde_json::to_value(payload).unwrap();
        assert_eq!(json["title"], "Landing");
        assert_eq!(json["documentBody"], "<p>hi</p>");
        assert_eq!(json["version"], 7);
    }

    #[test]
    fn publish_payload_omits_a_missing_slug() {
        let json = serde_json::to_value(PublishPayload {
            action: "publish",
            slug: None,
        })
        .unwrap();
        assert_eq!(json["action"], "publish");
        assert!(json.get("slug").is_none());
    }
}
