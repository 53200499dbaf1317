pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

// Observability: metrics catalog and emission helpers
pub mod observability;

pub use pipeline::processing::consolidate::{
    ConsolidationResult, Consolidator, ConsolidatorConfig, DefaultConsolidator,
};
pub use pipeline::processing::document::{DocumentStatus, ParsedDocument, TabularBlock};
