use crate::domain::model::Receipt;
use crate::domain::ports::MessageSender;
use crate::utils::error::ProviderError;
use async_trait::async_trait;

/// Logs messages instead of sending them. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSender;

impl ConsoleSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, to: &str, body: &str) -> Result<Receipt, ProviderError> {
        tracing::debug!("📱 [dry run] to {}: {}", to, body.replace('\n', " "));
        Ok(Receipt { message_id: None })
    }
}
