//! HTTP implementation of the remote document store.
//!
//! Talks to the VitaTrack document service: one JSON document per path,
//! `GET` to read, `PUT` to overwrite, `GET` on a prefix to list a
//! collection as a JSON object keyed by child path segment. Authenticates
//! with a bearer API key.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use super::{RemoteDocs, RemoteError};

/// Remote document client backed by the document service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRemoteDocs {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpRemoteDocs {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Builds the full URL for a document path, normalizing the scheme.
    fn build_url(&self, path: &str) -> String {
        let base = if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://")
        {
            format!("https://{}", self.base_url)
        } else {
            self.base_url.clone()
        };

        format!("{}/docs/{}", base.trim_end_matches('/'), path)
    }

    fn check_status(status: reqwest::StatusCode) -> Result<(), RemoteError> {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RemoteError::Denied(status.to_string()));
        }
        if !status.is_success() {
            return Err(RemoteError::Network(format!(
                "Server returned status {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteDocs for HttpRemoteDocs {
    async fn write_document(&self, path: &str, value: Value) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(self.build_url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&value)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Self::check_status(response.status())
    }

    async fn read_document(&self, path: &str) -> Result<Option<Value>, RemoteError> {
        let response = self
            .client
            .get(self.build_url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(response.status())?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        Ok(Some(value))
    }

    async fn read_collection(
        &self,
        prefix: &str,
    ) -> Result<BTreeMap<String, Value>, RemoteError> {
        let response = self
            .client
            .get(self.build_url(prefix))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(BTreeMap::new());
        }
        Self::check_status(response.status())?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(RemoteError::Malformed(format!(
                "Expected object for collection {prefix}, got {other}"
            ))),
        }
    }
}
