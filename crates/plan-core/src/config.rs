//! Scenario parameters and statement ratio policies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How depreciation is derived for the income statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationPolicy {
    /// Fixed 5% of cost of goods sold.
    #[default]
    CostRatio,
    /// Total equipment cost spread evenly over the average useful life.
    StraightLine,
}

/// How the balance sheet is approximated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSheetPolicy {
    /// Assets 60%, liabilities 30%, equity 30% of revenue.
    #[default]
    RevenueRatio,
    /// Equipment plus cumulative gross profit; debt-financed share as liabilities.
    Cumulative,
}

/// How the cash-flow statement is approximated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowPolicy {
    /// Operating 80%, investing -20%, financing 10% of EBITDA.
    #[default]
    EbitdaRatio,
    /// Equipment purchase in the first year, constant interest on financed debt.
    EquipmentFinanced,
}

/// The set of placeholder ratio policies applied by the statement builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementPolicy {
    pub depreciation: DepreciationPolicy,
    pub balance_sheet: BalanceSheetPolicy,
    pub cash_flow: CashFlowPolicy,
}

impl StatementPolicy {
    /// Fixed fractions of revenue, cost and EBITDA throughout.
    pub fn ratio() -> Self {
        Self::default()
    }

    /// Statements driven by the equipment list: straight-line depreciation,
    /// cumulative balance sheet and a first-year equipment outlay.
    pub fn equipment_financed() -> Self {
        Self {
            depreciation: DepreciationPolicy::StraightLine,
            balance_sheet: BalanceSheetPolicy::Cumulative,
            cash_flow: CashFlowPolicy::EquipmentFinanced,
        }
    }
}

/// Parameters of a projection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Number of projected years (default 5).
    pub num_years: u32,
    /// Calendar year of the first projected point.
    pub base_year: i32,
    /// Income tax rate applied to EBIT (e.g., 0.25).
    pub tax_rate: Decimal,
    /// Share of equipment cost financed with debt, in [0, 1].
    pub debt_ratio: Decimal,
    /// Annual interest rate on financed equipment.
    pub interest_rate: Decimal,
    /// Placeholder ratio policies for derived statements.
    pub policy: StatementPolicy,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            num_years: 5,
            base_year: 2025,
            tax_rate: Decimal::new(25, 2),
            debt_ratio: Decimal::new(50, 2),
            interest_rate: Decimal::new(10, 2),
            policy: StatementPolicy::default(),
        }
    }
}
