//! # Pricing Engine
//!
//! Cost-of-labour and sale-price calculators.
//!
//! ## Calculator Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Step 1: Hourly rate                                                   │
//! │    pró-labore R$ 5.000 / (22 days × 8 h) = R$ 28,41 / h                │
//! │                                                                         │
//! │  Step 2: Total cost                                                    │
//! │    materials + hours × hourly rate + extras                            │
//! │                                                                         │
//! │  Step 3: Final price (ADDITIVE margin)                                 │
//! │    margin_value = cost × margin %                                      │
//! │    final_price  = cost + margin_value                                  │
//! │                                                                         │
//! │    R$ 100 at 20 % → margin R$ 20 → price R$ 120                         │
//! │    (not 100 / (1 − 0,20) = R$ 125)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative inputs are clamped to zero and zero denominators give zero
//! rates, so every input renders.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Percentage;

// =============================================================================
// Hourly Rate
// =============================================================================

/// Cost of one hour and one day of the owner's work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRate {
    pub hours_per_month: f64,
    pub hourly_rate: Money,
    pub daily_rate: Money,
}

/// Clamps negative and non-finite quantities to zero.
fn non_negative_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Derives the hourly and daily cost of labour from the monthly pró-labore.
///
/// ```rust
/// use fluxo_core::money::Money;
/// use fluxo_core::pricing::compute_hourly_rate;
///
/// let rate = compute_hourly_rate(Money::from_cents(440_000), 22.0, 8.0);
/// assert_eq!(rate.hours_per_month, 176.0);
/// assert_eq!(rate.hourly_rate.cents(), 2_500);
/// assert_eq!(rate.daily_rate.cents(), 20_000);
/// ```
pub fn compute_hourly_rate(pro_labore: Money, days_worked: f64, hours_per_day: f64) -> HourlyRate {
    let pro_labore = pro_labore.non_negative();
    let days_worked = non_negative_quantity(days_worked);
    let hours_per_day = non_negative_quantity(hours_per_day);

    let hours_per_month = days_worked * hours_per_day;

    HourlyRate {
        hours_per_month,
        hourly_rate: pro_labore.divide_by(hours_per_month),
        daily_rate: pro_labore.divide_by(days_worked),
    }
}

// =============================================================================
// Total Cost
// =============================================================================

/// One line of a product/service cost sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CostItem {
    /// Raw material or purchased input.
    Material { description: String, amount: Money },
    /// Hours of work charged at an hourly rate.
    Labor { hours: f64, hourly_rate: Money },
    /// Anything else (freight, packaging, fees).
    Extra { description: String, amount: Money },
}

impl CostItem {
    /// Cost of this line; negatives count as zero.
    pub fn cost(&self) -> Money {
        match self {
            CostItem::Material { amount, .. } | CostItem::Extra { amount, .. } => {
                amount.non_negative()
            }
            CostItem::Labor { hours, hourly_rate } => {
                let cents = hourly_rate.non_negative().cents() as f64 * non_negative_quantity(*hours);
                Money::from_cents(cents.round() as i64)
            }
        }
    }
}

/// Sums the cost sheet.
pub fn compute_total_cost(items: &[CostItem]) -> Money {
    items.iter().map(CostItem::cost).sum()
}

// =============================================================================
// Final Price
// =============================================================================

/// Price breakdown for the pricing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub total_cost: Money,
    pub margin_value: Money,
    pub final_price: Money,
}

impl PricingResult {
    /// Profit as a share of the final price (what the owner actually
    /// keeps per real sold). `None` for a zero price.
    ///
    /// R$ 100 + 20 % → R$ 20 of R$ 120 → 16,67 %.
    pub fn margin_on_price(&self) -> Option<Percentage> {
        self.margin_value.share_of(self.final_price)
    }

    /// `final_price / total_cost`, or `None` for a zero cost.
    pub fn markup_factor(&self) -> Option<f64> {
        if self.total_cost.is_zero() {
            None
        } else {
            Some(self.final_price.cents() as f64 / self.total_cost.cents() as f64)
        }
    }
}

/// Applies the additive margin to a total cost.
///
/// ```rust
/// use fluxo_core::money::Money;
/// use fluxo_core::pricing::compute_final_price;
/// use fluxo_core::types::Percentage;
///
/// let result = compute_final_price(Money::from_cents(10_000), Percentage::from_percent(20.0));
/// assert_eq!(result.margin_value.cents(), 2_000);
/// assert_eq!(result.final_price.cents(), 12_000);
/// ```
pub fn compute_final_price(total_cost: Money, margin: Percentage) -> PricingResult {
    let total_cost = total_cost.non_negative();
    let margin_value = total_cost.apply_percentage(margin);

    PricingResult {
        total_cost,
        margin_value,
        final_price: total_cost + margin_value,
    }
}
