//! Community issue delivery over a Discord-style webhook.

use std::time::Duration;

use serde::Serialize;

use crate::{IssueNotifier, NotifyError, NotifyFut};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

/// Posts issue text as JSON `{content, username}` to a webhook URL.
///
/// Any 2xx response counts as delivered. A notifier built without a URL
/// fails every submission with [`NotifyError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
    username: String,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, username: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url,
            username: username.into(),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn post(&self, content: &str) -> Result<(), NotifyError> {
        let Some(url) = self.url.as_deref() else {
            return Err(NotifyError::NotConfigured);
        };
        let payload = WebhookPayload {
            content,
            username: &self.username,
        };
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "Issue delivered");
            Ok(())
        } else {
            tracing::warn!(status = status.as_u16(), "Issue webhook rejected");
            Err(NotifyError::Status {
                status: status.as_u16(),
            })
        }
    }
}

impl IssueNotifier for WebhookNotifier {
    fn submit<'a>(&'a self, content: &'a str) -> NotifyFut<'a> {
        Box::pin(self.post(content))
    }
}
