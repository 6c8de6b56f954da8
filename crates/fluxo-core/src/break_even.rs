//! # Break-Even Engine
//!
//! Maximum sustainable pró-labore and break-even revenue.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  variable_costs   = revenue × variable_ratio                           │
//! │  max_pro_labore   = max(0, revenue − fixed − variable_costs)           │
//! │  break_even       = fixed / (1 − variable_ratio)                       │
//! │  target_revenue   = fixed / (1 − variable_ratio − desired_margin)      │
//! │                                                                         │
//! │  Example: revenue R$ 10.000, fixed R$ 3.000, variable 20 %             │
//! │    variable_costs = R$ 2.000                                           │
//! │    max_pro_labore = R$ 5.000                                           │
//! │    break_even     = R$ 3.750                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A business that cannot cover its costs has zero available pró-labore,
//! never a negative one. When the denominator reaches zero the revenue is
//! reported as [`BreakEvenRevenue::Unreachable`].
//!
//! Everything is recomputed from the full input on each call; the wizard
//! that collects the inputs step by step lives in the UI.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{div_round, Money};
use crate::types::Percentage;

/// Revenue needed to reach a goal, or a sentinel when no revenue can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", content = "amount", rename_all = "camelCase")]
pub enum BreakEvenRevenue {
    Reachable(Money),
    /// Variable costs (plus margin) eat 100 % or more of every sale.
    Unreachable,
}

impl BreakEvenRevenue {
    pub fn amount(&self) -> Option<Money> {
        match self {
            BreakEvenRevenue::Reachable(amount) => Some(*amount),
            BreakEvenRevenue::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, BreakEvenRevenue::Reachable(_))
    }
}

/// Inputs collected by the break-even wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenInput {
    pub estimated_revenue: Money,
    pub fixed_costs: Money,
    pub variable_cost_ratio: Percentage,
    pub desired_margin: Percentage,
}

/// Everything the wizard's result step displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenResult {
    pub variable_costs: Money,
    pub max_pro_labore: Money,
    pub break_even_revenue: BreakEvenRevenue,
    /// Revenue at which the desired margin is also covered.
    pub target_revenue: BreakEvenRevenue,
}

/// Largest pró-labore the estimated revenue can sustain, floored at zero.
///
/// ```rust
/// use fluxo_core::break_even::compute_max_pro_labore;
/// use fluxo_core::money::Money;
/// use fluxo_core::types::Percentage;
///
/// let max = compute_max_pro_labore(
///     Money::from_cents(1_000_000),
///     Money::from_cents(300_000),
///     Percentage::from_percent(20.0),
/// );
/// assert_eq!(max.cents(), 500_000);
/// ```
pub fn compute_max_pro_labore(
    estimated_revenue: Money,
    fixed_costs: Money,
    variable_cost_ratio: Percentage,
) -> Money {
    let revenue = estimated_revenue.non_negative();
    let variable_costs = revenue.apply_percentage(variable_cost_ratio);
    revenue
        .saturating_sub(fixed_costs.non_negative())
        .saturating_sub(variable_costs)
        .non_negative()
}

/// Revenue at which contribution margin covers the fixed costs.
///
/// ```rust
/// use fluxo_core::break_even::{compute_break_even_revenue, BreakEvenRevenue};
/// use fluxo_core::money::Money;
/// use fluxo_core::types::Percentage;
///
/// let revenue = compute_break_even_revenue(Money::from_cents(300_000), Percentage::from_percent(50.0));
/// assert_eq!(revenue, BreakEvenRevenue::Reachable(Money::from_cents(600_000)));
///
/// let never = compute_break_even_revenue(Money::from_cents(300_000), Percentage::from_percent(100.0));
/// assert_eq!(never, BreakEvenRevenue::Unreachable);
/// ```
pub fn compute_break_even_revenue(fixed_costs: Money, variable_cost_ratio: Percentage) -> BreakEvenRevenue {
    revenue_covering(fixed_costs, variable_cost_ratio)
}

/// `fixed / (1 − share)` in integer basis points.
fn revenue_covering(fixed_costs: Money, share: Percentage) -> BreakEvenRevenue {
    if share.is_full() {
        return BreakEvenRevenue::Unreachable;
    }
    let remaining_bps = (Percentage::FULL.bps() - share.bps()) as i128;
    let cents = div_round(fixed_costs.non_negative().cents() as i128 * 10_000, remaining_bps);
    match i64::try_from(cents) {
        Ok(cents) => BreakEvenRevenue::Reachable(Money::from_cents(cents)),
        Err(_) => BreakEvenRevenue::Unreachable,
    }
}

/// Runs the whole wizard computation.
pub fn analyze(input: &BreakEvenInput) -> BreakEvenResult {
    let revenue = input.estimated_revenue.non_negative();
    BreakEvenResult {
        variable_costs: revenue.apply_percentage(input.variable_cost_ratio),
        max_pro_labore: compute_max_pro_labore(
            input.estimated_revenue,
            input.fixed_costs,
            input.variable_cost_ratio,
        ),
        break_even_revenue: compute_break_even_revenue(input.fixed_costs, input.variable_cost_ratio),
        target_revenue: revenue_covering(
            input.fixed_costs,
            input.variable_cost_ratio.saturating_add(input.desired_margin),
        ),
    }
}
