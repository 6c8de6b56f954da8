//! # Money Module
//!
//! Provides the `Money` type for handling monetary values in Brazilian reais.
//!
//! ## Why Integer Centavos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The hosted backend stores `valor` as a JSON number:                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ a DRE that never balances        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos                                         │
//! │    R$ 0,10 + R$ 0,20 = 10 + 20 = 30 centavos                            │
//! │    Floats are converted ONCE at the boundary (`from_reais_f64`)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fluxo_core::money::Money;
//! use fluxo_core::types::Percentage;
//!
//! let cost = Money::from_cents(10_000); // R$ 100,00
//! let margin = cost.apply_percentage(Percentage::from_percent(20.0));
//! assert_eq!(margin.cents(), 2_000);
//! assert_eq!((cost + margin).to_string(), "R$ 120,00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::Percentage;

/// Largest value (in reais) accepted from a float boundary.
///
/// Anything above this cannot be represented exactly in an `f64` at
/// centavo precision.
const MAX_SAFE_REAIS: f64 = 90_071_992_547_409.0;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a real).
///
/// ## Design Decisions
/// - **i64 (signed)**: despesas and negative balances are representable
/// - **Single field tuple struct**: zero-cost over i64
/// - **Serialized as the raw centavo count** so the front end never sees floats
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Form input "R$ 1.234,56" ──► currency::parse ──► Money(123456)         │
/// │                                                        │                │
/// │         ┌──────────────────────┬───────────────────────┤                │
/// │         ▼                      ▼                       ▼                │
/// │   PricingEngine         BreakEvenEngine        IncomeStatement (DRE)    │
/// │         │                      │                       │                │
/// │         └──────────────► currency::format ◄────────────┘                │
/// │                          "R$ 1.234,56"                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use fluxo_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole reais and centavos.
    ///
    /// For negative amounts only `reais` carries the sign:
    /// `from_reais_centavos(-5, 50)` is -R$ 5,50.
    #[inline]
    pub const fn from_reais_centavos(reais: i64, centavos: i64) -> Self {
        if reais < 0 {
            Money(reais * 100 - centavos)
        } else {
            Money(reais * 100 + centavos)
        }
    }

    /// Converts a float amount in reais (as stored by the hosted backend).
    ///
    /// Rounds half away from zero to the nearest centavo. Fails with
    /// [`CoreError::InvalidAmount`] for NaN, infinities and magnitudes that
    /// cannot be held at centavo precision.
    ///
    /// ```rust
    /// use fluxo_core::money::Money;
    ///
    /// assert_eq!(Money::from_reais_f64(12.5).unwrap().cents(), 1250);
    /// assert!(Money::from_reais_f64(f64::NAN).is_err());
    /// ```
    pub fn from_reais_f64(reais: f64) -> CoreResult<Self> {
        if !reais.is_finite() {
            return Err(CoreError::InvalidAmount {
                reason: format!("{reais} is not a finite number"),
            });
        }
        if reais.abs() > MAX_SAFE_REAIS {
            return Err(CoreError::InvalidAmount {
                reason: format!("{reais} exceeds the supported range"),
            });
        }
        Ok(Money((reais * 100.0).round() as i64))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-reais portion (truncated toward zero).
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount as a float in reais, for charts and exports only.
    #[inline]
    pub fn to_reais_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// Calculator inputs are never rejected for being negative; they are
    /// treated as zero so the screen always has something to render.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies by a percentage, rounding half away from zero.
    ///
    /// Uses i128 so large ledgers cannot overflow the intermediate product.
    ///
    /// ```rust
    /// use fluxo_core::money::Money;
    /// use fluxo_core::types::Percentage;
    ///
    /// // R$ 10,00 × 8,25 % = R$ 0,825 → R$ 0,83
    /// let amount = Money::from_cents(1000);
    /// assert_eq!(amount.apply_percentage(Percentage::from_bps(825)).cents(), 83);
    /// ```
    pub fn apply_percentage(&self, rate: Percentage) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        Money::from_cents(saturate(div_round(product, 10_000)))
    }

    /// Subtraction that clamps at the `i64` bounds instead of overflowing.
    #[inline]
    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Divides by a non-integer quantity (hours, days), rounding to the
    /// nearest centavo. A zero or non-finite divisor yields zero.
    pub fn divide_by(&self, divisor: f64) -> Money {
        if divisor == 0.0 || !divisor.is_finite() {
            return Money::zero();
        }
        Money(((self.0 as f64) / divisor).round() as i64)
    }

    /// Returns what share of `total` this amount represents.
    ///
    /// `None` when `total` is zero.
    pub fn share_of(&self, total: Money) -> Option<Percentage> {
        if total.is_zero() {
            return None;
        }
        let bps = div_round(self.0 as i128 * 10_000, total.0 as i128);
        Some(Percentage::from_bps(bps.clamp(0, u32::MAX as i128) as u32))
    }
}

/// Narrows an i128 centavo count, clamping to the `i64` range.
fn saturate(cents: i128) -> i64 {
    i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX })
}

/// Integer division rounding half away from zero.
pub(crate) fn div_round(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator != 0);
    let (n, d) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    if n >= 0 {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the pt-BR currency format: `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::currency::format(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a whole quantity (months, units).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_from_reais_centavos() {
        assert_eq!(Money::from_reais_centavos(10, 99).cents(), 1099);
        assert_eq!(Money::from_reais_centavos(-5, 50).cents(), -550);
    }

    #[test]
    fn test_from_reais_f64() {
        assert_eq!(Money::from_reais_f64(1234.56).unwrap().cents(), 123_456);
        assert_eq!(Money::from_reais_f64(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_reais_f64(-7.5).unwrap().cents(), -750);

        assert!(Money::from_reais_f64(f64::NAN).is_err());
        assert!(Money::from_reais_f64(f64::INFINITY).is_err());
        assert!(Money::from_reais_f64(1e20).is_err());
    }

    #[test]
    fn test_display_is_pt_br() {
        assert_eq!(Money::from_cents(123_456).to_string(), "R$ 1.234,56");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::zero().to_string(), "R$ 0,00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_apply_percentage_rounding() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.apply_percentage(Percentage::from_bps(1000)).cents(), 100);
        assert_eq!(amount.apply_percentage(Percentage::from_bps(825)).cents(), 83);

        // Negative amounts round away from zero as well
        let refund = Money::from_cents(-1000);
        assert_eq!(refund.apply_percentage(Percentage::from_bps(825)).cents(), -83);
    }

    #[test]
    fn test_divide_by() {
        let salary = Money::from_cents(500_000);
        assert_eq!(salary.divide_by(176.0).cents(), 2841);
        assert_eq!(salary.divide_by(0.0), Money::zero());
        assert_eq!(salary.divide_by(f64::NAN), Money::zero());
    }

    #[test]
    fn test_share_of() {
        let part = Money::from_cents(2_500);
        let total = Money::from_cents(10_000);
        assert_eq!(part.share_of(total), Some(Percentage::from_bps(2_500)));
        assert_eq!(part.share_of(Money::zero()), None);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Money::from_cents(-1).non_negative(), Money::zero());
        assert_eq!(Money::from_cents(5).non_negative().cents(), 5);
    }

    #[test]
    fn test_apply_percentage_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.apply_percentage(Percentage::from_bps(20_000)).cents(), i64::MAX);

        let min = Money::from_cents(i64::MIN);
        assert_eq!(min.apply_percentage(Percentage::from_bps(20_000)).cents(), i64::MIN);
    }

    #[test]
    fn test_saturating_sub() {
        let min = Money::from_cents(i64::MIN);
        assert_eq!(min.saturating_sub(Money::from_cents(1)).cents(), i64::MIN);
        assert_eq!(Money::from_cents(5).saturating_sub(Money::from_cents(7)).cents(), -2);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(5, 2), 3);
        assert_eq!(div_round(-5, 2), -3);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(div_round(5, -2), -3);
    }
}
