//! Reqwest-backed share notification adapter.
//!
//! Owns transport details only: request serialisation, timeout and HTTP
//! error mapping. The delivery endpoint is a mail gateway accepting a JSON
//! payload with recipient, subject, document id, and a link back into the
//! application.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;

use crate::domain::ports::{NotificationSender, NotificationSenderError};
use crate::domain::{Document, EmailAddress};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON payload posted to the mail gateway.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareMessage<'a> {
    to: &'a str,
    subject: String,
    document_id: String,
    link: String,
}

/// Share notification adapter that POSTs to a mail gateway endpoint.
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    public_base_url: Url,
}

impl HttpMailer {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, public_base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, public_base_url, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        endpoint: Url,
        public_base_url: Url,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            public_base_url,
        })
    }

    fn build_message<'a>(
        &self,
        recipient: &'a EmailAddress,
        document: &Document,
    ) -> Result<ShareMessage<'a>, NotificationSenderError> {
        let link = self
            .public_base_url
            .join(&format!("documents/{}", document.id()))
            .map_err(|err| {
                NotificationSenderError::rejected(format!("invalid document link: {err}"))
            })?;
        Ok(ShareMessage {
            to: recipient.as_ref(),
            subject: format!("\"{}\" was shared with you", document.title()),
            document_id: document.id().to_string(),
            link: link.into(),
        })
    }
}

#[async_trait]
impl NotificationSender for HttpMailer {
    async fn send(
        &self,
        recipient: &EmailAddress,
        document: &Document,
    ) -> Result<(), NotificationSenderError> {
        let message = self.build_message(recipient, document)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&message)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(map_status_error(status, body.as_ref()));
        }

        tracing::debug!(document_id = %document.id(), "share notification delivered");
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> NotificationSenderError {
    if error.is_timeout() {
        NotificationSenderError::timeout(error.to_string())
    } else {
        NotificationSenderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotificationSenderError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            NotificationSenderError::timeout(message)
        }
        _ if status.is_client_error() => NotificationSenderError::rejected(message),
        _ => NotificationSenderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

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
