use crate::domain::model::Receipt;
use crate::utils::error::ProviderError;
use async_trait::async_trait;

/// Outbound text-message dispatch. One call per message, no retries.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<Receipt, ProviderError>;
}

#[async_trait]
impl<S: MessageSender + ?Sized> MessageSender for &S {
    async fn send(&self, to: &str, body: &str) -> Result<Receipt, ProviderError> {
        (**self).send(to, body).await
    }
}

#[async_trait]
impl<S: MessageSender + ?Sized> MessageSender for Box<S> {
    async fn send(&self, to: &str, body: &str) -> Result<Receipt, ProviderError> {
        (**self).send(to, body).await
    }
}
