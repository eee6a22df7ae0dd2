//! Believability score for a projection.

use crate::{max_of, min_of, safe_ratio};
use rust_decimal::Decimal;
use tracing::debug;

const GROWTH_PENALTY: i32 = 15;
const UTILIZATION_PENALTY: i32 = 10;
const MARGIN_PENALTY: i32 = 20;

/// Score a projection from 0 to 100.
///
/// Starts at 100 and applies independent penalties:
/// - 15 when peak revenue exceeds five times the lowest year
/// - 10 when utilization ever exceeds 95%
/// - 20 when the lowest revenue does not cover the lowest cost
///
/// Ratio penalties with a non-positive denominator are skipped.
pub fn score(revenue: &[Decimal], cost: &[Decimal], utilization: &[Decimal]) -> u8 {
    let max_rev = max_of(revenue);
    let min_rev = min_of(revenue);
    let min_cost = min_of(cost);

    let mut score: i32 = 100;
    let growth = max_rev.zip(min_rev).and_then(|(hi, lo)| safe_ratio(hi, lo));
    if growth.is_some_and(|r| r > Decimal::new(5, 0)) {
        score -= GROWTH_PENALTY;
    }
    if max_of(utilization).is_some_and(|u| u > Decimal::new(95, 0)) {
        score -= UTILIZATION_PENALTY;
    }
    let coverage = min_rev.zip(min_cost).and_then(|(r, c)| safe_ratio(r, c));
    if coverage.is_some_and(|r| r < Decimal::ONE) {
        score -= MARGIN_PENALTY;
    }

    let clamped = score.clamp(0, 100) as u8;
    debug!(score = clamped, "believability score");
    clamped
}
