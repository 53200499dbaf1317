pub mod consolidation_use_case;
pub mod ports;

pub use consolidation_use_case::ConsolidationUseCase;
