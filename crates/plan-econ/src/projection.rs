//! Year-by-year revenue, cost, production and utilization projection.

use crate::safe_ratio;
use plan_core::{
    total_capacity, total_equipment_cost, CostDrivers, EntityState, Equipment, Product,
    ScenarioConfig,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One projected year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i32,
    pub revenue: Decimal,
    pub cost: Decimal,
    /// Units produced across all product lines.
    pub production: Decimal,
    /// Production as a percentage of aggregate capacity. Values above 100
    /// signal overcapacity.
    pub utilization_pct: Decimal,
}

/// Revenue contributed by a single product line, one entry per year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    pub revenue: Vec<Decimal>,
}

/// Summary of the equipment list the series was projected against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalBase {
    /// Aggregate capacity in units per year.
    pub total_capacity: u64,
    pub total_equipment_cost: Decimal,
    /// Mean useful life in years; `None` without equipment.
    pub average_useful_life: Option<Decimal>,
}

impl CapitalBase {
    pub fn from_equipment(equipment: &[Equipment]) -> Self {
        let total_life: u64 = equipment.iter().map(|e| u64::from(e.useful_life)).sum();
        let average_useful_life =
            safe_ratio(Decimal::from(total_life), Decimal::from(equipment.len()));
        Self {
            total_capacity: total_capacity(equipment),
            total_equipment_cost: total_equipment_cost(equipment),
            average_useful_life,
        }
    }
}

/// Ordered per-year projection; the engine's central output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub points: Vec<YearPoint>,
    pub product_revenue: Vec<ProductLine>,
    pub capital: CapitalBase,
}

impl YearSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn revenue(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.revenue).collect()
    }

    pub fn cost(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.cost).collect()
    }

    pub fn production(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.production).collect()
    }

    pub fn utilization(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.utilization_pct).collect()
    }
}

/// Per-unit production cost of a product.
///
/// The flat `unit_cost` wins when present; otherwise the cost driver stored
/// under the product's driver key is summed. A product with neither costs
/// nothing to produce.
pub fn effective_unit_cost(product: &Product, drivers: &CostDrivers) -> Decimal {
    if let Some(cost) = product.unit_cost {
        return cost;
    }
    match drivers.get(product.driver_key()) {
        Some(driver) => driver.unit_cost(),
        None => {
            warn!(product = %product.name, key = product.driver_key(), "no unit cost or cost driver; assuming zero cost");
            Decimal::ZERO
        }
    }
}

/// Project revenue, cost, production and utilization over `num_years`
/// starting at `base_year`.
///
/// Units of each product compound annually: year `i` produces
/// `initial_units * (1 + growth_rate)^i`. Utilization is zero when there is
/// no capacity. Arithmetic saturates rather than overflowing.
pub fn project(
    equipment: &[Equipment],
    products: &[Product],
    drivers: &CostDrivers,
    base_year: i32,
    num_years: u32,
) -> YearSeries {
    let n = num_years as usize;
    let mut points: Vec<YearPoint> = (0..num_years)
        .map(|i| YearPoint {
            year: base_year.saturating_add_unsigned(i),
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            production: Decimal::ZERO,
            utilization_pct: Decimal::ZERO,
        })
        .collect();

    let mut product_revenue = Vec::with_capacity(products.len());
    for product in products {
        let unit_cost = effective_unit_cost(product, drivers);
        let growth = Decimal::ONE.saturating_add(product.growth_rate);
        let mut units = Decimal::from(product.initial_units);
        let mut line = Vec::with_capacity(n);
        for point in points.iter_mut() {
            let revenue = units.saturating_mul(product.unit_price);
            point.revenue = point.revenue.saturating_add(revenue);
            point.cost = point.cost.saturating_add(units.saturating_mul(unit_cost));
            point.production = point.production.saturating_add(units);
            line.push(revenue);
            units = units.saturating_mul(growth);
        }
        product_revenue.push(ProductLine {
            name: product.name.clone(),
            revenue: line,
        });
    }

    let capital = CapitalBase::from_equipment(equipment);
    let capacity = Decimal::from(capital.total_capacity);
    for point in points.iter_mut() {
        point.utilization_pct = safe_ratio(point.production, capacity)
            .map(|r| r.saturating_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO);
    }

    debug!(
        years = n,
        products = products.len(),
        equipment = equipment.len(),
        capacity = capital.total_capacity,
        "projected year series"
    );
    YearSeries {
        points,
        product_revenue,
        capital,
    }
}

/// Project a persisted entity snapshot with the scenario's horizon.
pub fn project_state(state: &EntityState, config: &ScenarioConfig) -> YearSeries {
    project(
        &state.equipment,
        &state.products,
        &state.cost_drivers,
        config.base_year,
        config.num_years,
    )
}
