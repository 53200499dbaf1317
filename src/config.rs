use crate::error::{EngineError, Result};
use crate::pipeline::processing::consolidate::ConsolidatorConfig;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub consolidation: ConsolidationSettings,
}

#[derive(Debug, Deserialize)]
pub struct ConsolidationSettings {
    pub default_sheet_name: String,
    pub identifier_confidence: f64,
    pub inferred_confidence: f64,
    pub duplicate_detail_cap: usize,
    pub sample_detail_cap: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EngineError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

impl From<&ConsolidationSettings> for ConsolidatorConfig {
    fn from(settings: &ConsolidationSettings) -> Self {
        Self {
            default_sheet_name: settings.default_sheet_name.clone(),
            identifier_confidence: settings.identifier_confidence,
            inferred_confidence: settings.inferred_confidence,
            duplicate_detail_cap: settings.duplicate_detail_cap,
            sample_detail_cap: settings.sample_detail_cap,
        }
    }
}
