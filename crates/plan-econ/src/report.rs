//! One-call pipeline from entity state to every engine output.

use crate::{
    analyze, build_statements, project_state, score, DerivedStatements, SwotResult, YearSeries,
};
use plan_core::{EntityState, ScenarioConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything the presentation layer needs for one scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub config: ScenarioConfig,
    pub series: YearSeries,
    pub statements: DerivedStatements,
    pub swot: SwotResult,
    /// Believability score in [0, 100].
    pub score: u8,
}

impl ScenarioReport {
    pub fn build(state: &EntityState, config: &ScenarioConfig) -> Self {
        let series = project_state(state, config);
        let statements = build_statements(&series, config);
        let revenue = series.revenue();
        let cost = series.cost();
        let utilization = series.utilization();
        let swot = analyze(&revenue, &cost, &utilization);
        let score = score(&revenue, &cost, &utilization);
        info!(
            years = series.len(),
            score,
            findings = swot.iter().count(),
            "scenario report built"
        );
        Self {
            config: config.clone(),
            series,
            statements,
            swot,
            score,
        }
    }
}
