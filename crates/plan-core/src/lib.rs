#![deny(warnings)]

//! Core entity models and invariants for the manufacturing expansion planner.
//!
//! This crate defines the serializable records supplied to the projection
//! engine, the persisted [`EntityState`] aggregate, scenario parameters and
//! the validation helpers input suppliers run before projecting.

pub mod config;

pub use config::{
    BalanceSheetPolicy, CashFlowPolicy, DepreciationPolicy, ScenarioConfig, StatementPolicy,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// How a piece of equipment is paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingMethod {
    /// Cash purchase
    Cash,
    /// Short-term debt
    ShortTermDebt,
    /// Long-term debt
    LongTermDebt,
    /// $1 buyout lease
    BuyoutLease,
    /// Fair-market-value lease
    FmvLease,
}

/// A production asset contributing capacity to the plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Equipment name, e.g. "CNC Mill".
    pub name: String,
    /// Purchase cost in USD (> 0).
    pub cost: Decimal,
    /// Useful life in years (> 0).
    pub useful_life: u32,
    /// Maximum production capacity in units per year (> 0).
    pub max_capacity: u64,
    /// Financing method, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingMethod>,
}

/// A product line with a compound annual growth curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name.
    pub name: String,
    /// Units produced in the first projected year (> 0).
    pub initial_units: u64,
    /// Selling price per unit in USD (> 0).
    pub unit_price: Decimal,
    /// Flat production cost per unit. When absent the assigned cost driver is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    /// Annual production growth as a fraction in (0, 1].
    pub growth_rate: Decimal,
    /// Key of the assigned cost driver; defaults to the product name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_driver: Option<String>,
}

impl Product {
    /// Key under which this product's cost driver is stored.
    pub fn driver_key(&self) -> &str {
        self.cost_driver.as_deref().unwrap_or(&self.name)
    }
}

/// Hour-based cost component: `cost_per_hour * hours_per_unit` per unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourlyRate {
    pub cost_per_hour: Decimal,
    pub hours_per_unit: Decimal,
}

impl HourlyRate {
    /// Cost contributed to one produced unit.
    pub fn per_unit(&self) -> Decimal {
        self.cost_per_hour.saturating_mul(self.hours_per_unit)
    }
}

/// Per-unit cost decomposition used instead of a flat unit cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostDriver {
    /// Direct per-unit amounts.
    PerUnit {
        equipment: Decimal,
        machinist_labor: Decimal,
        design_labor: Decimal,
        supervision: Decimal,
    },
    /// Hourly rates; equipment time is listed per machine.
    Hourly {
        #[serde(default)]
        equipment: BTreeMap<String, HourlyRate>,
        machinist_labor: HourlyRate,
        design_labor: HourlyRate,
        supervision: HourlyRate,
    },
}

impl CostDriver {
    /// Sum of the equipment, machinist, design and supervision components.
    pub fn unit_cost(&self) -> Decimal {
        match self {
            CostDriver::PerUnit {
                equipment,
                machinist_labor,
                design_labor,
                supervision,
            } => equipment
                .saturating_add(*machinist_labor)
                .saturating_add(*design_labor)
                .saturating_add(*supervision),
            CostDriver::Hourly {
                equipment,
                machinist_labor,
                design_labor,
                supervision,
            } => equipment
                .values()
                .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.per_unit()))
                .saturating_add(machinist_labor.per_unit())
                .saturating_add(design_labor.per_unit())
                .saturating_add(supervision.per_unit()),
        }
    }

    fn amounts(&self) -> Vec<Decimal> {
        match self {
            CostDriver::PerUnit {
                equipment,
                machinist_labor,
                design_labor,
                supervision,
            } => vec![*equipment, *machinist_labor, *design_labor, *supervision],
            CostDriver::Hourly {
                equipment,
                machinist_labor,
                design_labor,
                supervision,
            } => equipment
                .values()
                .chain([machinist_labor, design_labor, supervision])
                .flat_map(|r| [r.cost_per_hour, r.hours_per_unit])
                .collect(),
        }
    }
}

/// Cost drivers keyed by product name or equipment type.
pub type CostDrivers = BTreeMap<String, CostDriver>;

/// Persisted set of entities a projection is computed from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub cost_drivers: CostDrivers,
}

impl EntityState {
    pub fn add_equipment(&mut self, equipment: Equipment) {
        debug!(name = %equipment.name, "adding equipment");
        self.equipment.push(equipment);
    }

    /// Remove the first equipment with the given name.
    pub fn remove_equipment(&mut self, name: &str) -> Option<Equipment> {
        let idx = self.equipment.iter().position(|e| e.name == name)?;
        debug!(name, "removing equipment");
        Some(self.equipment.remove(idx))
    }

    /// Add a product, storing its cost driver under the product's driver key.
    pub fn add_product(&mut self, product: Product, driver: Option<CostDriver>) {
        debug!(name = %product.name, has_driver = driver.is_some(), "adding product");
        if let Some(driver) = driver {
            self.cost_drivers
                .insert(product.driver_key().to_string(), driver);
        }
        self.products.push(product);
    }

    /// Remove the first product with the given name. Its cost driver entry is
    /// dropped as well unless another product still refers to it.
    pub fn remove_product(&mut self, name: &str) -> Option<Product> {
        let idx = self.products.iter().position(|p| p.name == name)?;
        let removed = self.products.remove(idx);
        let key = removed.driver_key();
        if !self.products.iter().any(|p| p.driver_key() == key) {
            self.cost_drivers.remove(key);
        }
        debug!(name, "removing product");
        Some(removed)
    }

    /// Aggregate capacity of all equipment in units per year.
    pub fn total_capacity(&self) -> u64 {
        total_capacity(&self.equipment)
    }

    /// Sum of equipment purchase costs.
    pub fn total_equipment_cost(&self) -> Decimal {
        total_equipment_cost(&self.equipment)
    }
}

/// Aggregate capacity in units per year; saturates at `u64::MAX`.
pub fn total_capacity(equipment: &[Equipment]) -> u64 {
    equipment
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.max_capacity))
}

/// Sum of purchase costs; saturates at `Decimal::MAX`.
pub fn total_equipment_cost(equipment: &[Equipment]) -> Decimal {
    equipment
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.cost))
}

/// Validation errors for malformed inputs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Names must be non-blank.
    #[error("name must not be empty")]
    EmptyName,
    /// Prices and equipment costs must be > 0; driver amounts must be >= 0.
    #[error("invalid monetary value for {0}")]
    InvalidMoney(String),
    /// Useful life must be at least one year.
    #[error("useful life of {0} must be > 0")]
    NonPositiveLife(String),
    /// Capacity and initial volume must be strictly positive.
    #[error("units for {0} must be > 0")]
    NonPositiveUnits(String),
    /// Growth rate must be within (0, 1].
    #[error("growth rate of {0} must be within (0,1]")]
    InvalidGrowth(String),
    /// Rate outside [0, 1].
    #[error("{0} must be within [0,1]")]
    RateOutOfRange(&'static str),
    /// Year outside supported range [1970, 2100].
    #[error("year {0} is out of supported range [1970, 2100]")]
    YearOutOfRange(i32),
    /// Projection horizon outside [1, 50] years.
    #[error("projection horizon {0} must be within [1, 50] years")]
    HorizonOutOfRange(u32),
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn check_rate(rate: Decimal, field: &'static str) -> Result<(), ValidationError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ValidationError::RateOutOfRange(field));
    }
    Ok(())
}

/// Validate a piece of equipment.
pub fn validate_equipment(e: &Equipment) -> Result<(), ValidationError> {
    check_name(&e.name)?;
    if e.cost <= Decimal::ZERO {
        return Err(ValidationError::InvalidMoney(e.name.clone()));
    }
    if e.useful_life == 0 {
        return Err(ValidationError::NonPositiveLife(e.name.clone()));
    }
    if e.max_capacity == 0 {
        return Err(ValidationError::NonPositiveUnits(e.name.clone()));
    }
    Ok(())
}

/// Validate a product line.
pub fn validate_product(p: &Product) -> Result<(), ValidationError> {
    check_name(&p.name)?;
    if p.initial_units == 0 {
        return Err(ValidationError::NonPositiveUnits(p.name.clone()));
    }
    if p.unit_price <= Decimal::ZERO {
        return Err(ValidationError::InvalidMoney(p.name.clone()));
    }
    if matches!(p.unit_cost, Some(c) if c <= Decimal::ZERO) {
        return Err(ValidationError::InvalidMoney(p.name.clone()));
    }
    if p.growth_rate <= Decimal::ZERO || p.growth_rate > Decimal::ONE {
        return Err(ValidationError::InvalidGrowth(p.name.clone()));
    }
    Ok(())
}

/// Validate a cost driver stored under `key`.
pub fn validate_cost_driver(key: &str, d: &CostDriver) -> Result<(), ValidationError> {
    check_name(key)?;
    if d.amounts().iter().any(|v| *v < Decimal::ZERO) {
        return Err(ValidationError::InvalidMoney(key.to_string()));
    }
    if let CostDriver::Hourly { equipment, .. } = d {
        for name in equipment.keys() {
            check_name(name)?;
        }
    }
    Ok(())
}

/// Validate every entity of a state snapshot.
pub fn validate_state(state: &EntityState) -> Result<(), ValidationError> {
    for e in &state.equipment {
        validate_equipment(e)?;
    }
    for p in &state.products {
        validate_product(p)?;
    }
    for (key, d) in &state.cost_drivers {
        validate_cost_driver(key, d)?;
    }
    Ok(())
}

/// Validate scenario parameters.
pub fn validate_config(c: &ScenarioConfig) -> Result<(), ValidationError> {
    if !(1..=50).contains(&c.num_years) {
        return Err(ValidationError::HorizonOutOfRange(c.num_years));
    }
    if !(1970..=2100).contains(&c.base_year) {
        return Err(ValidationError::YearOutOfRange(c.base_year));
    }
    check_rate(c.tax_rate, "tax rate")?;
    check_rate(c.debt_ratio, "debt ratio")?;
    check_rate(c.interest_rate, "interest rate")?;
    Ok(())
}
