use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::app::ports::ConsolidationOutputPort;
use crate::pipeline::processing::consolidate::ConsolidationResult;

/// File-based adapter for writing consolidation results to NDJSON files
pub struct ConsolidationOutputAdapter {
    /// Base output directory for consolidation results
    pub output_dir: PathBuf,
    /// Whether to create subdirectories by date
    pub use_date_partitioning: bool,
}

impl ConsolidationOutputAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            use_date_partitioning: true,
        }
    }

    /// Determine the output file path for a consolidation result
    fn get_output_path(&self, result: &ConsolidationResult) -> PathBuf {
        let mut path = self.output_dir.clone();

        if self.use_date_partitioning {
            let year = result.run.consolidated_at.format("%Y");
            let month = result.run.consolidated_at.format("%m");
            let day = result.run.consolidated_at.format("%d");

            path.push(format!("year={}", year));
            path.push(format!("month={}", month));
            path.push(format!("day={}", day));
        }

        path.push(format!(
            "consolidation-{}.ndjson",
            result.run.consolidated_at.format("%Y%m%d")
        ));
        path
    }

    async fn ensure_output_directory(&self, file_path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent_dir) = file_path.parent() {
            if !parent_dir.exists() {
                tokio::fs::create_dir_all(parent_dir)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to create output directory {:?}: {}", parent_dir, e))?;

                debug!("Created output directory: {:?}", parent_dir);
            }
        }
        Ok(())
    }

    fn result_to_json_line(&self, result: &ConsolidationResult) -> anyhow::Result<String> {
        let json_record = serde_json::to_string(result)
            .map_err(|e| anyhow::anyhow!("Failed to serialize consolidation result to JSON: {}", e))?;
        Ok(format!("{}\n", json_record))
    }
}

#[async_trait]
impl ConsolidationOutputPort for ConsolidationOutputAdapter {
    async fn write_consolidation(&self, result: &ConsolidationResult) -> anyhow::Result<()> {
        let output_path = self.get_output_path(result);

        self.ensure_output_directory(&output_path).await?;

        let json_line = self.result_to_json_line(result)?;

        // Append to the file (create if doesn't exist)
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&output_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open output file {:?}: {}", output_path, e))?;

        file.write_all(json_line.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write to output file {:?}: {}", output_path, e))?;

        file.flush()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to flush output file {:?}: {}", output_path, e))?;

        debug!(
            "Successfully wrote consolidation run {} to {:?}",
            result.run.run_id, output_path
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::consolidate::{Consolidator, DefaultConsolidator};
    use crate::pipeline::processing::document::{ParsedDocument, TabularBlock};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_result() -> ConsolidationResult {
        let columns = vec!["Entity Name".to_string()];
        let rows = vec![[("Entity Name".to_string(), json!("Acme Corp"))]
            .into_iter()
            .collect::<serde_json::Map<String, serde_json::Value>>()];
        let doc = ParsedDocument::ok("sites.xlsx", None, TabularBlock::new(columns, rows));
        DefaultConsolidator::new().consolidate(&[doc]).unwrap()
    }

    #[tokio::test]
    async fn test_write_consolidation_result() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = ConsolidationOutputAdapter::new(temp_dir.path().to_path_buf());

        let result = sample_result();
        adapter.write_consolidation(&result).await.unwrap();

        let output_path = adapter.get_output_path(&result);
        assert!(output_path.exists());

        let contents = tokio::fs::read_to_string(&output_path).await.unwrap();
        assert!(contents.contains("\"entities\""));
        assert!(contents.contains("\"narrative\""));
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_output_path_generation() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = ConsolidationOutputAdapter::new(temp_dir.path().to_path_buf());

        let path = adapter.get_output_path(&sample_result());
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("year="));
        assert!(path_str.contains("month="));
        assert!(path_str.contains("day="));
        assert!(path_str.ends_with(".ndjson"));
    }

    #[tokio::test]
    async fn test_no_date_partitioning() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = ConsolidationOutputAdapter::new(temp_dir.path().to_path_buf());
        adapter.use_date_partitioning = false;

        let path = adapter.get_output_path(&sample_result());
        let path_str = path.to_string_lossy();
        assert!(!path_str.contains("year="));
        assert!(path_str.ends_with(".ndjson"));
    }

    #[tokio::test]
    async fn test_json_line_is_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = ConsolidationOutputAdapter::new(temp_dir.path().to_path_buf());

        let line = adapter.result_to_json_line(&sample_result()).unwrap();
        assert!(line.ends_with('\n'));
        assert!(serde_json::from_str::<serde_json::Value>(line.trim_end()).is_ok());
    }
}
