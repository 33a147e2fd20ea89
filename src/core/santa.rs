use crate::core::assignment::{verify_assignment, AssignmentEngine, Population};
use crate::core::notifier::Notifier;
use crate::domain::model::{Assignment, ContactDirectory, Family, RunSummary};
use crate::domain::ports::MessageSender;
use crate::utils::error::Result;
use rand::Rng;

/// Draws an assignment, checks it, then notifies every giver.
pub struct SantaEngine<R: Rng, S: MessageSender> {
    assigner: AssignmentEngine<R>,
    notifier: Notifier<S>,
}

impl<R: Rng, S: MessageSender> SantaEngine<R, S> {
    pub fn new(assigner: AssignmentEngine<R>, notifier: Notifier<S>) -> Self {
        Self { assigner, notifier }
    }

    /// Assignment plus verification. Nothing is sent.
    pub fn draw(&mut self, families: &[Family]) -> Result<Assignment> {
        let population = Population::from_families(families)?;
        tracing::info!(
            "🎲 Drawing secret santas for {} people in {} families",
            population.len(),
            families.len()
        );

        let assignment = self.assigner.assign_population(&population)?;

        // 送出前再檢查一次，不合規則的結果絕不通知
        verify_assignment(&assignment, &population, self.assigner.strategy())?;
        tracing::info!("✅ Assignment verified");

        Ok(assignment)
    }

    pub async fn run(
        &mut self,
        families: &[Family],
        directory: &ContactDirectory,
    ) -> Result<RunSummary> {
        let assignment = self.draw(families)?;

        tracing::info!("📨 Sending {} notifications", assignment.len());
        let results = self.notifier.notify(&assignment, directory).await;
        let summary = RunSummary::new(results);

        tracing::info!(
            "Notifications finished: {} sent, {} failed",
            summary.sent(),
            summary.failed()
        );
        Ok(summary)
    }
}
