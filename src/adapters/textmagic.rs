use crate::config::credentials::Credentials;
use crate::domain::model::Receipt;
use crate::domain::ports::MessageSender;
use crate::utils::error::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// TextMagic REST v2 client. Sends each message with a single request.
pub struct TextMagicClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    text: &'a str,
    phones: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SendMessageResponse {
    id: Option<serde_json::Value>,
    #[serde(rename = "messageId")]
    message_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

impl TextMagicClient {
    pub fn new(
        credentials: Credentials,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
            credentials,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/api/v2/messages", self.base_url.trim_end_matches('/'))
    }
}

fn id_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl MessageSender for TextMagicClient {
    async fn send(&self, to: &str, body: &str) -> std::result::Result<Receipt, ProviderError> {
        tracing::debug!("POST {} (to {})", self.messages_url(), to);

        let response = self
            .client
            .post(self.messages_url())
            .header("X-TM-Username", self.credentials.username())
            .header("X-TM-Key", self.credentials.token())
            .json(&SendMessageRequest { text: body, phones: to })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("TextMagic response status: {}", status);

        if status.is_success() {
            // 回應格式不符時仍視為成功，只是沒有訊息編號
            let parsed = response
                .json::<SendMessageResponse>()
                .await
                .unwrap_or_default();
            return Ok(Receipt {
                message_id: parsed.message_id.or(parsed.id).map(id_to_string),
            });
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    text.clone()
                }
            });

        Err(ProviderError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
