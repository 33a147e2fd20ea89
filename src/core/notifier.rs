use crate::domain::model::{
    Assignment, ContactDirectory, NotificationFailure, NotificationResult, NotificationStatus,
    Person,
};
use crate::domain::ports::MessageSender;
use chrono::Utc;
use std::time::Duration;

pub const DEFAULT_TEMPLATE: &str =
    "Hej {giver}!\n\nDin hemliga julklappsmottagare är: {recipient} \n\nGod Jul önskar Tomten!";

/// Pause between two sends unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Message body with `{giver}` and `{recipient}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn render(&self, giver: &Person, recipient: &Person) -> String {
        self.0
            .replace("{giver}", giver.name())
            .replace("{recipient}", recipient.name())
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

pub struct Notifier<S: MessageSender> {
    sender: S,
    template: MessageTemplate,
    delay: Duration,
}

impl<S: MessageSender> Notifier<S> {
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            template: MessageTemplate::default(),
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sends one message per giver, in assignment order. Failures are
    /// recorded per giver and never stop the remaining sends.
    pub async fn notify(
        &self,
        assignment: &Assignment,
        directory: &ContactDirectory,
    ) -> Vec<NotificationResult> {
        let mut results = Vec::with_capacity(assignment.len());
        let mut dispatched = false;

        for (giver, recipient) in assignment.iter() {
            let status = match directory.contact_for(giver) {
                Ok(address) => {
                    // 避免短時間內大量發送
                    if dispatched && !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    dispatched = true;

                    let body = self.template.render(giver, recipient);
                    match self.sender.send(address, &body).await {
                        Ok(receipt) => {
                            tracing::debug!("Message to {} accepted", giver);
                            NotificationStatus::Sent {
                                message_id: receipt.message_id,
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Sending to {} failed: {}", giver, e);
                            NotificationStatus::Failed(NotificationFailure::Provider(e))
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", giver, e);
                    NotificationStatus::Failed(NotificationFailure::Directory(e))
                }
            };

            results.push(NotificationResult {
                giver: giver.clone(),
                recipient: recipient.clone(),
                status,
                attempted_at: Utc::now(),
            });
        }

        results
    }
}
