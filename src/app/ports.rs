use async_trait::async_trait;

use crate::pipeline::processing::consolidate::ConsolidationResult;

/// Output port for delivering consolidation results to downstream
/// collaborators (reporting, export writers, review UIs)
#[async_trait]
pub trait ConsolidationOutputPort: Send + Sync {
    async fn write_consolidation(&self, result: &ConsolidationResult) -> anyhow::Result<()>;
}
