#![deny(warnings)]

//! Projection and heuristic engine for manufacturing expansion scenarios.
//!
//! Everything in this crate is a pure function over caller-supplied
//! snapshots:
//! - [`project`] turns equipment and product lines into a [`YearSeries`]
//! - [`build_statements`] derives placeholder income, balance-sheet and
//!   cash-flow tables from the series
//! - [`analyze`] and [`score`] apply threshold rules to the series
//!
//! Degenerate inputs (no products, no equipment, zero costs) yield zeroed or
//! skipped results rather than errors.

pub mod projection;
pub mod report;
pub mod sanity;
pub mod statements;
pub mod swot;

pub use projection::{
    effective_unit_cost, project, project_state, CapitalBase, ProductLine, YearPoint, YearSeries,
};
pub use report::ScenarioReport;
pub use sanity::score;
pub use statements::{build_statements, BalanceRow, CashFlowRow, DerivedStatements, IncomeRow};
pub use swot::{analyze, Finding, SwotResult};

use rust_decimal::Decimal;

/// Division guarded against non-positive denominators.
///
/// Returns `None` when `denominator <= 0`; callers pick their own fallback
/// (zero utilization, or skipping a ratio rule).
///
/// Example:
/// assert_eq!(safe_ratio(Decimal::new(3, 0), Decimal::new(2, 0)), Some(Decimal::new(15, 1)));
/// assert_eq!(safe_ratio(Decimal::ONE, Decimal::ZERO), None);
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        return None;
    }
    numerator.checked_div(denominator)
}

pub(crate) fn max_of(values: &[Decimal]) -> Option<Decimal> {
    values.iter().copied().max()
}

pub(crate) fn min_of(values: &[Decimal]) -> Option<Decimal> {
    values.iter().copied().min()
}
