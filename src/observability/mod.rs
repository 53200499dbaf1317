// Observability: metrics catalog and emission helpers

pub mod metrics;
