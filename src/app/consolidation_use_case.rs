use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::app::ports::ConsolidationOutputPort;
use crate::domain::Severity;
use crate::observability::metrics::{emit_counter, emit_gauge, emit_histogram, MetricName};
use crate::pipeline::processing::consolidate::{ConsolidationResult, Consolidator, DefaultConsolidator};
use crate::pipeline::processing::document::ParsedDocument;

/// Use case for consolidating a batch of parsed documents into a canonical
/// entity roster and delivering the result downstream
pub struct ConsolidationUseCase {
    /// The consolidator implementation running the pipeline
    consolidator: Box<dyn Consolidator + Send + Sync>,
    /// Output port for writing consolidation results
    output_port: Arc<dyn ConsolidationOutputPort>,
}

impl ConsolidationUseCase {
    /// Create a new use case with the default consolidator
    pub fn new(output_port: Arc<dyn ConsolidationOutputPort>) -> Self {
        Self {
            consolidator: Box::new(DefaultConsolidator::new()),
            output_port,
        }
    }

    /// Create a use case with a custom consolidator
    pub fn with_consolidator(
        consolidator: Box<dyn Consolidator + Send + Sync>,
        output_port: Arc<dyn ConsolidationOutputPort>,
    ) -> Self {
        Self {
            consolidator,
            output_port,
        }
    }

    /// Run consolidation over a batch of parsed documents
    pub async fn consolidate_documents(&self, docs: &[ParsedDocument]) -> Result<ConsolidationResult> {
        let start_time = std::time::Instant::now();

        info!("Starting consolidation for {} documents", docs.len());
        emit_gauge(MetricName::ConsolidationBatchSize, docs.len() as f64);

        let result = match self.consolidator.consolidate(docs) {
            Ok(result) => result,
            Err(e) => {
                error!("Consolidation failed: {}", e);
                return Err(e);
            }
        };

        emit_counter(
            MetricName::ConsolidationDocumentsProcessed,
            result.run.documents_processed as u64,
        );
        emit_counter(
            MetricName::ConsolidationDocumentsSkipped,
            result.run.documents_skipped as u64,
        );
        emit_counter(
            MetricName::ConsolidationEntitiesConsolidated,
            result.entities.len() as u64,
        );

        if !result.issues.is_empty() {
            emit_counter(MetricName::ConsolidationIssuesDetected, result.issues.len() as u64);
            let errors = result
                .issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .count();
            if errors > 0 {
                warn!("Consolidation flagged {} error-severity issues", errors);
            }
            for issue in &result.issues {
                debug!(code = issue.code.as_str(), severity = issue.severity.as_str(), "{}", issue.message);
            }
        }

        if let Err(e) = self.output_port.write_consolidation(&result).await {
            error!("Failed to write consolidation result: {}", e);
            emit_counter(MetricName::ConsolidationOutputFailed, 1);
            return Err(e);
        }

        let duration = start_time.elapsed();
        emit_histogram(MetricName::ConsolidationRunDuration, duration.as_secs_f64());
        emit_counter(MetricName::ConsolidationRunsCompleted, 1);
        info!(
            "Consolidation run {} completed in {:.2}ms: {} entities, {} issues",
            result.run.run_id,
            duration.as_millis(),
            result.entities.len(),
            result.issues.len()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::document::TabularBlock;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    // Mock output port for testing
    struct MockConsolidationOutputPort {
        written: Arc<Mutex<Vec<ConsolidationResult>>>,
        fail: bool,
    }

    impl MockConsolidationOutputPort {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            }
        }

        fn written_results(&self) -> Vec<ConsolidationResult> {
            self.written.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConsolidationOutputPort for MockConsolidationOutputPort {
        async fn write_consolidation(&self, result: &ConsolidationResult) -> Result<()> {
            if self.fail {
                anyhow::bail!("sink unavailable");
            }
            self.written.lock().unwrap().push(result.clone());
            Ok(())
        }
    }

    fn sample_doc() -> ParsedDocument {
        let columns = vec!["Entity Name".to_string(), "Country".to_string()];
        let rows = vec![[
            ("Entity Name".to_string(), json!("Acme Corp")),
            ("Country".to_string(), json!("Japan")),
        ]
        .into_iter()
        .collect::<serde_json::Map<String, serde_json::Value>>()];
        ParsedDocument::ok("sites.xlsx", None, TabularBlock::new(columns, rows))
    }

    #[tokio::test]
    async fn test_consolidate_writes_result_to_output() {
        let mock_output = Arc::new(MockConsolidationOutputPort::new());
        let use_case = ConsolidationUseCase::new(mock_output.clone());

        let result = use_case.consolidate_documents(&[sample_doc()]).await.unwrap();
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].country_code.as_deref(), Some("JP"));

        let written = mock_output.written_results();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].run.run_id, result.run.run_id);
    }

    #[tokio::test]
    async fn test_output_failure_surfaces_as_error() {
        let mock_output = Arc::new(MockConsolidationOutputPort::failing());
        let use_case = ConsolidationUseCase::new(mock_output);

        let result = use_case.consolidate_documents(&[sample_doc()]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_an_error() {
        let mock_output = Arc::new(MockConsolidationOutputPort::new());
        let use_case = ConsolidationUseCase::new(mock_output.clone());

        let result = use_case.consolidate_documents(&[]).await.unwrap();
        assert!(result.entities.is_empty());
        assert_eq!(
            result.narrative,
            "No entities could be consolidated from the supplied documents."
        );
        assert_eq!(mock_output.written_results().len(), 1);
    }
}
