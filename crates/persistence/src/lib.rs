#![deny(warnings)]

//! Persistence layer: entity repositories, scenario files and report export.

pub mod export;
pub mod scenario;

pub use export::{export_report, write_report};
pub use scenario::{load_scenario, parse_scenario};

use plan_core::{validate_state, EntityState, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

/// Returns the default location of the saved entity state.
pub fn default_state_path() -> &'static str {
    "./saves/financial_model.json"
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid state json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid entities: {0}")]
    Invalid(#[from] ValidationError),
    #[error("repository lock poisoned")]
    Poisoned,
}

/// Load/save boundary between input suppliers and the engine.
///
/// The engine only ever sees values returned by [`EntityRepository::load`].
pub trait EntityRepository {
    fn load(&self) -> Result<EntityState, PersistenceError>;
    fn save(&self, state: &EntityState) -> Result<(), PersistenceError>;
}

/// Entity state stored as pretty-printed JSON with `equipment`, `products`
/// and `cost_drivers` keys.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntityRepository for JsonFileRepository {
    /// A missing file loads as an empty state.
    fn load(&self) -> Result<EntityState, PersistenceError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no saved state; starting empty");
            return Ok(EntityState::default());
        }
        let text = fs::read_to_string(&self.path)?;
        let state: EntityState = serde_json::from_str(&text)?;
        validate_state(&state)?;
        info!(
            path = %self.path.display(),
            equipment = state.equipment.len(),
            products = state.products.len(),
            "loaded state"
        );
        Ok(state)
    }

    fn save(&self, state: &EntityState) -> Result<(), PersistenceError> {
        validate_state(state)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(state)?;
        // Replaced via a sibling temp file; the previous save survives a failed write.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "saved state");
        Ok(())
    }
}

/// Repository keeping the state in memory, for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<EntityState>,
}

impl InMemoryRepository {
    pub fn new(state: EntityState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl EntityRepository for InMemoryRepository {
    fn load(&self) -> Result<EntityState, PersistenceError> {
        let guard = self.state.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, state: &EntityState) -> Result<(), PersistenceError> {
        validate_state(state)?;
        let mut guard = self.state.lock().map_err(|_| PersistenceError::Poisoned)?;
        *guard = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::{CostDriver, Equipment, FinancingMethod, HourlyRate, Product};
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn sample_state() -> EntityState {
        let mut state = EntityState::default();
        state.add_equipment(Equipment {
            name: "Press".to_string(),
            cost: Decimal::new(250_000, 0),
            useful_life: 8,
            max_capacity: 4_000,
            financing: Some(FinancingMethod::BuyoutLease),
        });
        let rate = |cph: i64| HourlyRate {
            cost_per_hour: Decimal::new(cph, 0),
            hours_per_unit: Decimal::new(25, 2),
        };
        let mut equipment = BTreeMap::new();
        equipment.insert("Press".to_string(), rate(80));
        state.add_product(
            Product {
                name: "Hinge".to_string(),
                initial_units: 2_000,
                unit_price: Decimal::new(4_999, 2),
                unit_cost: None,
                growth_rate: Decimal::new(5, 2),
                cost_driver: None,
            },
            Some(CostDriver::Hourly {
                equipment,
                machinist_labor: rate(30),
                design_labor: rate(40),
                supervision: rate(20),
            }),
        );
        state
    }

    #[test]
    fn default_path_is_json() {
        assert!(default_state_path().ends_with(".json"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("absent.json"));
        assert_eq!(repo.load().unwrap(), EntityState::default());
    }

    #[test]
    fn json_roundtrip_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/model.json"));
        let state = sample_state();
        repo.save(&state).unwrap();
        let first = fs::read_to_string(repo.path()).unwrap();
        let loaded = repo.load().unwrap();
        assert_eq!(loaded, state);
        repo.save(&loaded).unwrap();
        assert_eq!(fs::read_to_string(repo.path()).unwrap(), first);

        let raw: serde_json::Value = serde_json::from_str(&first).unwrap();
        for key in ["equipment", "products", "cost_drivers"] {
            assert!(raw.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"equipment":[{"name":"Press","cost":"1000","useful_life":0,"max_capacity":10}]}"#,
        )
        .unwrap();
        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Invalid(_)));

        fs::write(&path, "not json").unwrap();
        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Json(_)));
    }

    #[test]
    fn in_memory_repository_snapshots() {
        let repo = InMemoryRepository::default();
        assert_eq!(repo.load().unwrap(), EntityState::default());
        let mut state = sample_state();
        repo.save(&state).unwrap();
        state.remove_product("Hinge");
        assert_eq!(repo.load().unwrap().products.len(), 1);
    }
}
