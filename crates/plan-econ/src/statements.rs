//! Approximate income statement, balance sheet and cash-flow tables.
//!
//! The ratios are illustrative placeholders rather than accounting-derived
//! figures. Which variant applies is chosen by the scenario's
//! [`StatementPolicy`](plan_core::StatementPolicy).

use crate::projection::YearSeries;
use plan_core::{BalanceSheetPolicy, CashFlowPolicy, DepreciationPolicy, ScenarioConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPERATING_EXPENSE_RATIO: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const DEPRECIATION_RATIO: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
const ASSET_RATIO: Decimal = Decimal::from_parts(6, 0, 0, false, 1);
const LIABILITY_RATIO: Decimal = Decimal::from_parts(3, 0, 0, false, 1);
const EQUITY_RATIO: Decimal = Decimal::from_parts(3, 0, 0, false, 1);
const OPERATING_CF_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);
const INVESTING_CF_RATIO: Decimal = Decimal::from_parts(2, 0, 0, true, 1);
const FINANCING_CF_RATIO: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Operating cash retained from EBITDA when equipment drives the statements.
const FINANCED_OPERATING_CF_RATIO: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    pub year: i32,
    pub revenue: Decimal,
    pub cogs: Decimal,
    pub gross_profit: Decimal,
    pub operating_expenses: Decimal,
    pub ebitda: Decimal,
    pub depreciation: Decimal,
    pub ebit: Decimal,
    pub net_income: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub year: i32,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub equity: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRow {
    pub year: i32,
    pub operating: Decimal,
    pub investing: Decimal,
    pub financing: Decimal,
}

/// Three parallel per-year tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedStatements {
    pub income: Vec<IncomeRow>,
    pub balance_sheet: Vec<BalanceRow>,
    pub cash_flow: Vec<CashFlowRow>,
}

/// Derive statements from a projected series under the configured policy,
/// tax rate, debt ratio and interest rate.
///
/// Arithmetic saturates, so a series already pinned at `Decimal::MAX` yields
/// pinned rows rather than overflowing.
pub fn build_statements(series: &YearSeries, config: &ScenarioConfig) -> DerivedStatements {
    let policy = config.policy;
    let capital = &series.capital;

    let straight_line =
        straight_line_charge(capital.total_equipment_cost, capital.average_useful_life);
    let after_tax = Decimal::ONE.saturating_sub(config.tax_rate);

    let income: Vec<IncomeRow> = series
        .points
        .iter()
        .map(|p| {
            let gross_profit = p.revenue.saturating_sub(p.cost);
            let operating_expenses = p.cost.saturating_mul(OPERATING_EXPENSE_RATIO);
            let ebitda = gross_profit.saturating_sub(operating_expenses);
            let depreciation = match policy.depreciation {
                DepreciationPolicy::CostRatio => p.cost.saturating_mul(DEPRECIATION_RATIO),
                DepreciationPolicy::StraightLine => straight_line,
            };
            let ebit = ebitda.saturating_sub(depreciation);
            IncomeRow {
                year: p.year,
                revenue: p.revenue,
                cogs: p.cost,
                gross_profit,
                operating_expenses,
                ebitda,
                depreciation,
                ebit,
                net_income: ebit.saturating_mul(after_tax),
            }
        })
        .collect();

    let financed_debt = capital.total_equipment_cost.saturating_mul(config.debt_ratio);
    let mut cumulative_profit = Decimal::ZERO;
    let balance_sheet = series
        .points
        .iter()
        .map(|p| match policy.balance_sheet {
            BalanceSheetPolicy::RevenueRatio => BalanceRow {
                year: p.year,
                assets: p.revenue.saturating_mul(ASSET_RATIO),
                liabilities: p.revenue.saturating_mul(LIABILITY_RATIO),
                equity: p.revenue.saturating_mul(EQUITY_RATIO),
            },
            BalanceSheetPolicy::Cumulative => {
                cumulative_profit =
                    cumulative_profit.saturating_add(p.revenue.saturating_sub(p.cost));
                let assets = capital.total_equipment_cost.saturating_add(cumulative_profit);
                BalanceRow {
                    year: p.year,
                    assets,
                    liabilities: financed_debt,
                    equity: assets.saturating_sub(financed_debt),
                }
            }
        })
        .collect();

    let interest = financed_debt.saturating_mul(config.interest_rate);
    let cash_flow = income
        .iter()
        .enumerate()
        .map(|(i, row)| match policy.cash_flow {
            CashFlowPolicy::EbitdaRatio => CashFlowRow {
                year: row.year,
                operating: row.ebitda.saturating_mul(OPERATING_CF_RATIO),
                investing: row.ebitda.saturating_mul(INVESTING_CF_RATIO),
                financing: row.ebitda.saturating_mul(FINANCING_CF_RATIO),
            },
            CashFlowPolicy::EquipmentFinanced => CashFlowRow {
                year: row.year,
                operating: row.ebitda.saturating_mul(FINANCED_OPERATING_CF_RATIO),
                investing: if i == 0 {
                    -capital.total_equipment_cost
                } else {
                    Decimal::ZERO
                },
                financing: interest,
            },
        })
        .collect();

    debug!(years = series.len(), ?policy, "built derived statements");
    DerivedStatements {
        income,
        balance_sheet,
        cash_flow,
    }
}

/// Annual straight-line charge; lives shorter than one year count as one.
fn straight_line_charge(total_cost: Decimal, average_life: Option<Decimal>) -> Decimal {
    match average_life {
        Some(life) => total_cost / life.max(Decimal::ONE),
        None => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;
    use plan_core::{CostDrivers, Equipment, Product, StatementPolicy};
    use proptest::prelude::*;

    fn reference_series() -> YearSeries {
        let equipment = vec![
            Equipment {
                name: "CNC Mill".to_string(),
                cost: Decimal::new(500_000, 0),
                useful_life: 10,
                max_capacity: 10_000,
                financing: None,
            },
            Equipment {
                name: "Lathe".to_string(),
                cost: Decimal::new(100_000, 0),
                useful_life: 5,
                max_capacity: 2_000,
                financing: None,
            },
        ];
        let products = vec![Product {
            name: "Widget".to_string(),
            initial_units: 1000,
            unit_price: Decimal::new(100, 0),
            unit_cost: Some(Decimal::new(50, 0)),
            growth_rate: Decimal::new(10, 2),
            cost_driver: None,
        }];
        project(&equipment, &products, &CostDrivers::new(), 2025, 5)
    }

    #[test]
    fn ratio_policy_first_year() {
        let s = build_statements(&reference_series(), &ScenarioConfig::default());
        let inc = &s.income[0];
        assert_eq!(inc.gross_profit, Decimal::new(50_000, 0));
        assert_eq!(inc.operating_expenses, Decimal::new(10_000, 0));
        assert_eq!(inc.ebitda, Decimal::new(40_000, 0));
        assert_eq!(inc.depreciation, Decimal::new(2_500, 0));
        assert_eq!(inc.ebit, Decimal::new(37_500, 0));
        assert_eq!(inc.net_income, Decimal::new(28_125, 0));

        let bs = &s.balance_sheet[0];
        assert_eq!(bs.assets, Decimal::new(60_000, 0));
        assert_eq!(bs.liabilities, Decimal::new(30_000, 0));
        assert_eq!(bs.equity, Decimal::new(30_000, 0));

        let cf = &s.cash_flow[0];
        assert_eq!(cf.operating, Decimal::new(32_000, 0));
        assert_eq!(cf.investing, Decimal::new(-8_000, 0));
        assert_eq!(cf.financing, Decimal::new(4_000, 0));
    }

    #[test]
    fn equipment_financed_policy() {
        let config = ScenarioConfig {
            policy: StatementPolicy::equipment_financed(),
            ..ScenarioConfig::default()
        };
        let s = build_statements(&reference_series(), &config);

        // 600k over an average life of 7.5 years
        for row in &s.income {
            assert_eq!(row.depreciation, Decimal::new(80_000, 0));
        }
        assert_eq!(s.income[0].ebit, Decimal::new(-40_000, 0));

        assert_eq!(s.balance_sheet[0].assets, Decimal::new(650_000, 0));
        // 650k + (110k - 55k)
        assert_eq!(s.balance_sheet[1].assets, Decimal::new(705_000, 0));
        for row in &s.balance_sheet {
            assert_eq!(row.liabilities, Decimal::new(300_000, 0));
            assert_eq!(row.equity, row.assets - row.liabilities);
        }

        assert_eq!(s.cash_flow[0].investing, Decimal::new(-600_000, 0));
        assert!(s.cash_flow[1..].iter().all(|r| r.investing.is_zero()));
        assert!(s
            .cash_flow
            .iter()
            .all(|r| r.financing == Decimal::new(30_000, 0)));
        assert_eq!(s.cash_flow[0].operating, Decimal::new(36_000, 0));
    }

    #[test]
    fn policies_can_be_mixed() {
        let config = ScenarioConfig {
            policy: StatementPolicy {
                depreciation: DepreciationPolicy::StraightLine,
                ..StatementPolicy::ratio()
            },
            ..ScenarioConfig::default()
        };
        let s = build_statements(&reference_series(), &config);
        assert_eq!(s.income[0].depreciation, Decimal::new(80_000, 0));
        assert_eq!(s.balance_sheet[0].assets, Decimal::new(60_000, 0));
    }

    #[test]
    fn straight_line_without_equipment_is_zero() {
        let mut series = reference_series();
        series.capital = Default::default();
        let config = ScenarioConfig {
            policy: StatementPolicy::equipment_financed(),
            ..ScenarioConfig::default()
        };
        let s = build_statements(&series, &config);
        assert!(s.income.iter().all(|r| r.depreciation.is_zero()));
        assert!(s.cash_flow.iter().all(|r| r.financing.is_zero()));
    }

    fn saturated_series() -> YearSeries {
        let mut series = reference_series();
        let products = vec![Product {
            name: "Ingot".to_string(),
            initial_units: 10_000_000_000_000_000_000,
            unit_price: Decimal::new(10_000_000_000, 0),
            unit_cost: Some(Decimal::ONE),
            growth_rate: Decimal::ONE,
            cost_driver: None,
        }];
        let projected = project(&[], &products, &CostDrivers::new(), 2025, 5);
        series.points = projected.points;
        series.product_revenue = projected.product_revenue;
        series
    }

    #[test]
    fn saturated_revenue_pins_statements() {
        let series = saturated_series();
        assert!(series.revenue().iter().all(|r| *r == Decimal::MAX));

        let ratio = build_statements(&series, &ScenarioConfig::default());
        assert_eq!(ratio.income.len(), 5);

        let config = ScenarioConfig {
            policy: StatementPolicy::equipment_financed(),
            ..ScenarioConfig::default()
        };
        let s = build_statements(&series, &config);
        let last = &s.balance_sheet[4];
        assert_eq!(last.assets, Decimal::MAX);
        assert_eq!(last.equity, Decimal::MAX - Decimal::new(300_000, 0));
    }

    #[test]
    fn empty_series_gives_empty_tables() {
        let s = build_statements(&YearSeries::default(), &ScenarioConfig::default());
        assert_eq!(s, DerivedStatements::default());
    }

    proptest! {
        #[test]
        fn tables_stay_parallel(years in 0u32..12, financed in any::<bool>()) {
            let mut series = reference_series();
            series.points.truncate(years.min(5) as usize);
            let config = ScenarioConfig {
                policy: if financed { StatementPolicy::equipment_financed() } else { StatementPolicy::ratio() },
                ..ScenarioConfig::default()
            };
            let s = build_statements(&series, &config);
            prop_assert_eq!(s.income.len(), series.len());
            prop_assert_eq!(s.balance_sheet.len(), series.len());
            prop_assert_eq!(s.cash_flow.len(), series.len());
            for row in &s.income {
                prop_assert_eq!(row.net_income, row.ebit * Decimal::new(75, 2));
            }
        }
    }
}
