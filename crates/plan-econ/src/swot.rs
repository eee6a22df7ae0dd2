//! Rule-based SWOT classification of a projection.

use crate::{max_of, min_of, safe_ratio};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single triggered SWOT rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    CapacityAvailable,
    StrongRevenueToCost,
    UtilizationBottleneck,
    ThinEarlyMargins,
    NoCostData,
    StrongGrowth,
    RoomForVolume,
    EarlyLosses,
    OvercapacityRisk,
}

impl Finding {
    pub fn message(self) -> &'static str {
        match self {
            Finding::CapacityAvailable => "capacity available for expansion",
            Finding::StrongRevenueToCost => "strong revenue-to-cost ratio",
            Finding::UtilizationBottleneck => "utilization bottleneck risk",
            Finding::ThinEarlyMargins => "revenue barely covers costs early",
            Finding::NoCostData => "no cost data available",
            Finding::StrongGrowth => "strong growth potential",
            Finding::RoomForVolume => "capacity to add more volume",
            Finding::EarlyLosses => "potential early losses",
            Finding::OvercapacityRisk => "overcapacity/downtime risk",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotResult {
    pub strengths: Vec<Finding>,
    pub weaknesses: Vec<Finding>,
    pub opportunities: Vec<Finding>,
    pub threats: Vec<Finding>,
}

impl SwotResult {
    /// All findings, in strengths/weaknesses/opportunities/threats order.
    pub fn iter(&self) -> impl Iterator<Item = Finding> + '_ {
        self.strengths
            .iter()
            .chain(&self.weaknesses)
            .chain(&self.opportunities)
            .chain(&self.threats)
            .copied()
    }
}

/// Classify a projection into strengths, weaknesses, opportunities and threats.
///
/// Each rule is an independent threshold check. When `cost` is empty or all
/// zero the ratio rules are skipped and [`Finding::NoCostData`] is reported
/// instead.
pub fn analyze(revenue: &[Decimal], cost: &[Decimal], utilization: &[Decimal]) -> SwotResult {
    let mut out = SwotResult::default();

    let max_util = max_of(utilization);
    let min_util = min_of(utilization);
    let max_rev = max_of(revenue);
    let min_rev = min_of(revenue);
    let max_cost = max_of(cost);
    let min_cost = min_of(cost);
    let has_cost = cost.iter().any(|c| !c.is_zero());

    if max_util.is_some_and(|u| u < Decimal::new(80, 0)) {
        out.strengths.push(Finding::CapacityAvailable);
    }
    if has_cost && ratio(max_rev, max_cost).is_some_and(|r| r > Decimal::new(15, 1)) {
        out.strengths.push(Finding::StrongRevenueToCost);
    }

    if min_util.is_some_and(|u| u > Decimal::new(90, 0)) {
        out.weaknesses.push(Finding::UtilizationBottleneck);
    }
    if !has_cost {
        out.weaknesses.push(Finding::NoCostData);
    } else if ratio(min_rev, min_cost).is_some_and(|r| r < Decimal::ONE) {
        out.weaknesses.push(Finding::ThinEarlyMargins);
    }

    if let (Some(hi), Some(lo)) = (max_rev, min_rev) {
        if hi > lo.saturating_mul(Decimal::new(2, 0)) {
            out.opportunities.push(Finding::StrongGrowth);
        }
    }
    if min_util.is_some_and(|u| u < Decimal::new(50, 0)) {
        out.opportunities.push(Finding::RoomForVolume);
    }

    if let (Some(r), Some(c)) = (min_rev, min_cost) {
        if r < c {
            out.threats.push(Finding::EarlyLosses);
        }
    }
    if max_util.is_some_and(|u| u > Decimal::new(95, 0)) {
        out.threats.push(Finding::OvercapacityRisk);
    }

    out
}

fn ratio(num: Option<Decimal>, den: Option<Decimal>) -> Option<Decimal> {
    safe_ratio(num?, den?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    fn reference() -> (Vec<Decimal>, Vec<Decimal>, Vec<Decimal>) {
        let growth = [
            Decimal::ONE,
            Decimal::new(11, 1),
            Decimal::new(121, 2),
            Decimal::new(1331, 3),
            Decimal::new(14641, 4),
        ];
        let revenue = growth.iter().map(|g| d(100_000) * *g).collect();
        let cost = growth.iter().map(|g| d(50_000) * *g).collect();
        let util = growth.iter().map(|g| d(10) * *g).collect();
        (revenue, cost, util)
    }

    #[test]
    fn reference_scenario_strengths() {
        let (rev, cost, util) = reference();
        let swot = analyze(&rev, &cost, &util);
        assert_eq!(
            swot.strengths,
            vec![Finding::CapacityAvailable, Finding::StrongRevenueToCost]
        );
        assert!(swot.weaknesses.is_empty());
        assert_eq!(swot.opportunities, vec![Finding::RoomForVolume]);
        assert!(swot.threats.is_empty());
        assert_eq!(
            Finding::CapacityAvailable.to_string(),
            "capacity available for expansion"
        );
    }

    #[test]
    fn stressed_plant() {
        let rev = vec![d(80), d(200)];
        let cost = vec![d(100), d(150)];
        let util = vec![d(92), d(120)];
        let swot = analyze(&rev, &cost, &util);
        assert!(swot.strengths.is_empty());
        assert_eq!(
            swot.weaknesses,
            vec![Finding::UtilizationBottleneck, Finding::ThinEarlyMargins]
        );
        assert_eq!(swot.opportunities, vec![Finding::StrongGrowth]);
        assert_eq!(
            swot.threats,
            vec![Finding::EarlyLosses, Finding::OvercapacityRisk]
        );
    }

    #[test]
    fn zero_cost_skips_ratio_rules() {
        let rev = vec![d(100), d(110)];
        let cost = vec![Decimal::ZERO, Decimal::ZERO];
        let util = vec![d(60), d(66)];
        let swot = analyze(&rev, &cost, &util);
        assert_eq!(swot.strengths, vec![Finding::CapacityAvailable]);
        assert_eq!(swot.weaknesses, vec![Finding::NoCostData]);
        assert!(swot.threats.is_empty());
    }

    #[test]
    fn empty_series_only_reports_missing_costs() {
        let swot = analyze(&[], &[], &[]);
        assert_eq!(swot.iter().collect::<Vec<_>>(), vec![Finding::NoCostData]);
    }

    #[test]
    fn saturated_revenue_is_not_growth() {
        let rev = vec![Decimal::MAX; 3];
        let cost = vec![d(1), d(2), d(4)];
        let util = vec![d(10), d(20), d(40)];
        let swot = analyze(&rev, &cost, &util);
        assert!(!swot.opportunities.contains(&Finding::StrongGrowth));
        assert!(swot.strengths.contains(&Finding::StrongRevenueToCost));
    }

    #[test]
    fn thresholds_are_strict() {
        let rev = vec![d(150), d(300)];
        let cost = vec![d(150), d(200)];
        let util = vec![d(50), d(80)];
        let swot = analyze(&rev, &cost, &util);
        // 300/200 == 1.5 and 300 == 2*150 do not trigger; 80 is not < 80
        assert!(swot.strengths.is_empty());
        assert!(swot.opportunities.is_empty());
        assert!(swot.weaknesses.is_empty());
        assert!(swot.threats.is_empty());
    }
}
