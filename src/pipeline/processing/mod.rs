pub mod columns;
pub mod consolidate;
pub mod dedupe;
pub mod document;
pub mod export;
pub mod extract;
pub mod geography;
pub mod hierarchy;
pub mod report;
