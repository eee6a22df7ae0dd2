//! YAML scenario files.
//!
//! Every field is optional; omitted fields take the [`ScenarioConfig`]
//! defaults:
//!
//! ```yaml
//! num_years: 7
//! base_year: 2026
//! debt_ratio: 0.4
//! policy:
//!   depreciation: straight_line
//! ```

use crate::PersistenceError;
use plan_core::{validate_config, ScenarioConfig};
use std::fs;
use std::path::Path;
use tracing::info;

/// Parse and validate a scenario from YAML text.
pub fn parse_scenario(text: &str) -> Result<ScenarioConfig, PersistenceError> {
    // An empty document deserializes to unit, not a map.
    if text.trim().is_empty() {
        return Ok(ScenarioConfig::default());
    }
    let config: ScenarioConfig = serde_yaml::from_str(text)?;
    validate_config(&config)?;
    Ok(config)
}

/// Read a scenario file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, PersistenceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let config = parse_scenario(&text)?;
    info!(
        path = %path.display(),
        years = config.num_years,
        base_year = config.base_year,
        "loaded scenario"
    );
    Ok(config)
}
