//! # Calculators
//!
//! The "Precificação" and "Ponto de equilíbrio" screens: raw form input in,
//! core results out, with defaults taken from [`PricingSettings`].

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use fluxo_core::break_even::{analyze, BreakEvenInput, BreakEvenResult};
use fluxo_core::currency;
use fluxo_core::pricing::{compute_final_price, compute_hourly_rate, compute_total_cost, CostItem, HourlyRate, PricingResult};
use fluxo_core::Percentage;

use crate::config::PricingSettings;

/// A priced quote with the hourly rate it was built on.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub hourly: HourlyRate,
    pub margin: Percentage,
    pub pricing: PricingResult,
}

/// Break-even form, amounts as typed and ratios in percent.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenForm {
    pub estimated_revenue: String,
    pub fixed_costs: String,
    pub variable_cost_percent: f64,
    pub desired_margin_percent: f64,
}

pub struct PricingCalculator {
    settings: PricingSettings,
}

impl PricingCalculator {
    pub fn new(settings: PricingSettings) -> Self {
        PricingCalculator { settings }
    }

    /// Hourly and daily rate for a pró-labore typed as currency text.
    ///
    /// A negative pró-labore counts as zero.
    pub fn hourly_rate(&self, pro_labore: &str) -> HourlyRate {
        compute_hourly_rate(
            currency::parse(pro_labore).non_negative(),
            self.settings.working_days_per_month,
            self.settings.hours_per_day,
        )
    }

    /// Prices `items` with `margin`, or the configured default margin.
    ///
    /// Labor items with a zero hourly rate are charged at the rate derived
    /// from `pro_labore`.
    pub fn quote(&self, pro_labore: &str, items: &[CostItem], margin: Option<Percentage>) -> Quote {
        let hourly = self.hourly_rate(pro_labore);
        let margin = margin.unwrap_or_else(|| Percentage::from_percent(self.settings.default_margin_percent));

        let priced: Vec<CostItem> = items
            .iter()
            .map(|item| match item {
                CostItem::Labor { hours, hourly_rate } if hourly_rate.is_zero() => CostItem::Labor {
                    hours: *hours,
                    hourly_rate: hourly.hourly_rate,
                },
                other => other.clone(),
            })
            .collect();

        let total_cost = compute_total_cost(&priced);
        let pricing = compute_final_price(total_cost, margin);
        debug!(cost = %total_cost, price = %pricing.final_price, %margin, "Quote computed");

        Quote { hourly, margin, pricing }
    }
}

/// Runs the break-even analysis on a raw form. Negative amounts count as zero.
pub fn break_even(form: &BreakEvenForm) -> BreakEvenResult {
    analyze(&BreakEvenInput {
        estimated_revenue: currency::parse(&form.estimated_revenue).non_negative(),
        fixed_costs: currency::parse(&form.fixed_costs).non_negative(),
        variable_cost_ratio: Percentage::from_percent(form.variable_cost_percent),
        desired_margin: Percentage::from_percent(form.desired_margin_percent),
    })
}
