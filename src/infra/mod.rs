pub mod consolidation_output_adapter;

pub use consolidation_output_adapter::ConsolidationOutputAdapter;
