use std::future::Future;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("conversational backend unavailable: {0}")]
    Unavailable(String),
    #[error("conversational backend declined to answer")]
    Rejected,
    #[error("conversational backend returned an unreadable payload: {0}")]
    Decode(String),
}

impl BackendError {
    /// Short label used for logs and metric tags.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Rejected => "rejected",
            Self::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BackendRequest<'a> {
    pub message: &'a str,
    pub language: &'a str,
}

/// Payload returned by the conversational backend. Only `success` and
/// `response` decide whether the reply is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub processing_mode: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl BackendReply {
    /// The reply text when the backend reported success with a non-blank
    /// answer.
    pub fn usable_text(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.response
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

pub trait ConversationBackend: Send + Sync {
    fn send(
        &self,
        message: &str,
        language: &str,
    ) -> impl Future<Output = Result<BackendReply, BackendError>> + Send;
}

/// JSON-over-HTTP backend. The request itself carries no timeout; the
/// dispatcher bounds it.
#[derive(Debug, Clone)]
pub struct HttpConversationBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpConversationBackend {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("raahi/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build conversational backend client")?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ConversationBackend for HttpConversationBackend {
    async fn send(&self, message: &str, language: &str) -> Result<BackendReply, BackendError> {
        let response = self
            .client
            .post(&self.url)
            .json(&BackendRequest { message, language })
            .send()
            .await
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Unavailable(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;

        serde_json::from_slice::<BackendReply>(&body)
            .map_err(|err| BackendError::Decode(err.to_string()))
    }
}
