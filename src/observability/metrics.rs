//! Metrics for the consolidation engine, following standard Prometheus
//! naming conventions. The exporter is the embedding application's concern;
//! this module only records against the `metrics` facade.

use std::fmt;

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Consolidation pipeline metrics
    ConsolidationRunsCompleted,
    ConsolidationDocumentsProcessed,
    ConsolidationDocumentsSkipped,
    ConsolidationEntitiesConsolidated,
    ConsolidationIssuesDetected,
    ConsolidationRunDuration,
    ConsolidationBatchSize,
    ConsolidationOutputFailed,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ConsolidationRunsCompleted => "org_boundary_consolidation_runs_completed_total",
            MetricName::ConsolidationDocumentsProcessed => {
                "org_boundary_consolidation_documents_processed_total"
            }
            MetricName::ConsolidationDocumentsSkipped => {
                "org_boundary_consolidation_documents_skipped_total"
            }
            MetricName::ConsolidationEntitiesConsolidated => {
                "org_boundary_consolidation_entities_consolidated_total"
            }
            MetricName::ConsolidationIssuesDetected => {
                "org_boundary_consolidation_issues_detected_total"
            }
            MetricName::ConsolidationRunDuration => "org_boundary_consolidation_run_duration_seconds",
            MetricName::ConsolidationBatchSize => "org_boundary_consolidation_batch_size",
            MetricName::ConsolidationOutputFailed => "org_boundary_consolidation_output_failed_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn emit_counter(name: MetricName, value: u64) {
    ::metrics::counter!(name.as_str()).increment(value);
}

pub fn emit_histogram(name: MetricName, value: f64) {
    ::metrics::histogram!(name.as_str()).record(value);
}

pub fn emit_gauge(name: MetricName, value: f64) {
    ::metrics::gauge!(name.as_str()).set(value);
}
