//! # Currency Module
//!
//! Parsing, formatting and validation of pt-BR currency strings.
//!
//! ## Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input typed by the user          parse()          format()            │
//! │  ──────────────────────           ───────          ────────            │
//! │  "R$ 1.234,56"                ──► 123456   ──►  "R$ 1.234,56"          │
//! │  "1234,5"                     ──► 123450   ──►  "R$ 1.234,50"          │
//! │  "10.50"   (dot only, ≤2 dec) ──► 1050     ──►  "R$ 10,50"             │
//! │  "1.500"   (dot only, 3 dec)  ──► 150000   ──►  "R$ 1.500,00"          │
//! │  "abc", ""                    ──► 0        ──►  "R$ 0,00"              │
//! │                                                                         │
//! │  `,` is the decimal point. `.` groups thousands when a comma is also   │
//! │  present. Nothing here panics or returns an error.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Round-Trip Law
//! For every `Money` value `m` above `i64::MIN` centavos:
//! `parse(&format(m)) == m`. The magnitude of `i64::MIN` does not fit in an
//! `i64`, so its formatted text parses to zero like any other overflow.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// Prefix used by the fixed pt-BR currency format.
pub const CURRENCY_PREFIX: &str = "R$";

/// Longest digit run accepted by the keystroke mask (R$ 9.999.999.999.999,99).
const MAX_MASK_DIGITS: usize = 15;

// =============================================================================
// Parsing
// =============================================================================

/// Parses a user-typed monetary string into centavos.
///
/// Returns `Money::zero()` for empty, unparseable or overflowing input.
///
/// ```rust
/// use fluxo_core::currency::parse;
///
/// assert_eq!(parse("R$ 1.234,56").cents(), 123_456);
/// assert_eq!(parse("-50,5").cents(), -5_050);
/// assert_eq!(parse("nada").cents(), 0);
/// ```
pub fn parse(input: &str) -> Money {
    let mut negative = false;
    let mut seen_digit = false;
    let mut cleaned = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                cleaned.push(c);
            }
            ',' | '.' => cleaned.push(c),
            '-' if !seen_digit => negative = true,
            _ => {}
        }
    }

    let (integer_part, fraction_part) = match decimal_separator_position(&cleaned) {
        Some(pos) => (&cleaned[..pos], &cleaned[pos + 1..]),
        None => (cleaned.as_str(), ""),
    };

    let cents = match to_cents(integer_part, fraction_part) {
        Some(cents) => cents,
        None => return Money::zero(),
    };

    if negative {
        Money::from_cents(-cents)
    } else {
        Money::from_cents(cents)
    }
}

/// Finds the byte index of the decimal separator in a cleaned string.
fn decimal_separator_position(cleaned: &str) -> Option<usize> {
    if let Some(pos) = cleaned.rfind(',') {
        return Some(pos);
    }

    // Dot only: "10.5" / "10.50" are decimals, "1.500" / "1.234.567" are
    // thousands groups.
    let pos = cleaned.rfind('.')?;
    let dots = cleaned.matches('.').count();
    let fraction_len = cleaned.len() - pos - 1;
    if dots == 1 && (1..=2).contains(&fraction_len) {
        Some(pos)
    } else {
        None
    }
}

/// Combines integer and fraction digit runs into centavos, rounding the
/// third fraction digit half away from zero. `None` on overflow or when
/// there are no digits at all.
fn to_cents(integer_part: &str, fraction_part: &str) -> Option<i64> {
    let integer_digits = integer_part.bytes().filter(u8::is_ascii_digit);
    let mut fraction_digits = fraction_part.bytes().filter(u8::is_ascii_digit);

    let mut any_digit = false;
    let mut reais: i64 = 0;
    for d in integer_digits {
        any_digit = true;
        reais = reais.checked_mul(10)?.checked_add((d - b'0') as i64)?;
    }

    let mut centavos: i64 = 0;
    for _ in 0..2 {
        centavos *= 10;
        if let Some(d) = fraction_digits.next() {
            any_digit = true;
            centavos += (d - b'0') as i64;
        }
    }
    if let Some(d) = fraction_digits.next() {
        any_digit = true;
        if d >= b'5' {
            centavos += 1;
        }
    }

    if !any_digit {
        return None;
    }

    reais.checked_mul(100)?.checked_add(centavos)
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats centavos as `R$ 1.234,56` (negative: `-R$ 1.234,56`).
///
/// ```rust
/// use fluxo_core::currency::format;
/// use fluxo_core::money::Money;
///
/// assert_eq!(format(Money::from_cents(123_456)), "R$ 1.234,56");
/// assert_eq!(format(Money::from_cents(5)), "R$ 0,05");
/// ```
pub fn format(amount: Money) -> String {
    let cents = amount.cents();
    let magnitude = cents.unsigned_abs();
    let reais = magnitude / 100;
    let centavos = magnitude % 100;

    let sign = if cents < 0 { "-" } else { "" };
    format!(
        "{sign}{CURRENCY_PREFIX} {},{centavos:02}",
        group_thousands(reais)
    )
}

/// Formats a float amount in reais. NaN and infinities render as `R$ 0,00`.
pub fn format_reais(value: f64) -> String {
    Money::from_reais_f64(value)
        .map(format)
        .unwrap_or_else(|_| format(Money::zero()))
}

/// Inserts `.` between groups of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Applies the cents-first input mask used by currency fields.
///
/// Every keystroke strips non-digits and reads the remaining digits as
/// centavos, so typing `1`, `2`, `3`, `4` shows `R$ 0,01` … `R$ 12,34`.
///
/// ```rust
/// use fluxo_core::currency::mask_keystroke;
///
/// assert_eq!(mask_keystroke("1234"), "R$ 12,34");
/// assert_eq!(mask_keystroke("R$ 12,345"), "R$ 123,45");
/// ```
pub fn mask_keystroke(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .take(MAX_MASK_DIGITS)
        .collect();
    let cents = digits.parse::<i64>().unwrap_or(0);
    format(Money::from_cents(cents))
}

// =============================================================================
// Validation
// =============================================================================

/// Which signs a monetary field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Any sign (bank balances).
    Signed,
    /// Zero or more (calculator inputs).
    #[default]
    NonNegative,
    /// Strictly more than zero (lançamento submission).
    Positive,
}

/// Validates an already-parsed amount against a sign policy.
///
/// Negative values on a non-negative field fail with
/// [`CoreError::InvalidAmount`]; zero on a positive-only field fails with
/// [`ValidationError::MustBePositive`].
pub fn validate(amount: Money, policy: SignPolicy) -> CoreResult<()> {
    match policy {
        SignPolicy::Signed => Ok(()),
        SignPolicy::NonNegative | SignPolicy::Positive if amount.is_negative() => {
            Err(CoreError::InvalidAmount {
                reason: "negative values are not allowed".to_string(),
            })
        }
        SignPolicy::Positive if amount.is_zero() => Err(ValidationError::MustBePositive {
            field: "valor".to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Validates a float amount in reais (persisted or computed).
///
/// NaN and infinities fail with [`CoreError::InvalidAmount`]; otherwise the
/// value is converted to centavos and checked against `policy`.
pub fn validate_reais(value: f64, policy: SignPolicy) -> CoreResult<Money> {
    let amount = Money::from_reais_f64(value)?;
    validate(amount, policy)?;
    Ok(amount)
}

// =============================================================================
// MonetaryAmount
// =============================================================================

/// The value behind a currency form field.
///
/// `amount` is always `parse(raw_input)`; the display string is always
/// `format(amount)`. Both are recomputed on every `set_input`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryAmount {
    raw_input: String,
    amount: Money,
}

impl MonetaryAmount {
    /// Creates a field value from what the user typed.
    pub fn from_input(raw_input: impl Into<String>) -> Self {
        let raw_input = raw_input.into();
        let amount = parse(&raw_input);
        MonetaryAmount { raw_input, amount }
    }

    /// Creates a field value from a persisted amount; the raw input becomes
    /// its formatted form so re-parsing yields the same value.
    pub fn from_money(amount: Money) -> Self {
        MonetaryAmount {
            raw_input: format(amount),
            amount,
        }
    }

    /// Replaces the typed text and re-derives the amount.
    pub fn set_input(&mut self, raw_input: impl Into<String>) {
        *self = Self::from_input(raw_input);
    }

    /// Clears the field (form reset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn display(&self) -> String {
        format(self.amount)
    }

    pub fn validate(&self, policy: SignPolicy) -> CoreResult<()> {
        validate(self.amount, policy)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pt_br() {
        assert_eq!(parse("R$ 1.234,56").cents(), 123_456);
        assert_eq!(parse("1234,56").cents(), 123_456);
        assert_eq!(parse("1.234.567,8").cents(), 123_456_780);
        assert_eq!(parse("0,5").cents(), 50);
        assert_eq!(parse(",75").cents(), 75);
        assert_eq!(parse("100").cents(), 10_000);
    }

    #[test]
    fn test_parse_dot_only() {
        assert_eq!(parse("10.5").cents(), 1_050);
        assert_eq!(parse("10.50").cents(), 1_050);
        assert_eq!(parse("1.500").cents(), 150_000);
        assert_eq!(parse("1.234.567").cents(), 123_456_700);
    }

    #[test]
    fn test_parse_rounds_third_fraction_digit() {
        assert_eq!(parse("1,005").cents(), 101);
        assert_eq!(parse("1,004").cents(), 100);
        assert_eq!(parse("-1,005").cents(), -101);
    }

    #[test]
    fn test_parse_sign() {
        assert_eq!(parse("-R$ 5,00").cents(), -500);
        assert_eq!(parse("R$ -5,00").cents(), -500);
        // A dash after the digits is noise, not a sign
        assert_eq!(parse("5-").cents(), 500);
    }

    #[test]
    fn test_parse_never_fails() {
        for input in ["", "   ", "abc", ",", ".", "R$", "--", "99999999999999999999999"] {
            assert_eq!(parse(input), Money::zero(), "input: {input:?}");
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format(Money::zero()), "R$ 0,00");
        assert_eq!(format(Money::from_cents(5)), "R$ 0,05");
        assert_eq!(format(Money::from_cents(100_000)), "R$ 1.000,00");
        assert_eq!(format(Money::from_cents(123_456_789)), "R$ 1.234.567,89");
        assert_eq!(format(Money::from_cents(-550)), "-R$ 5,50");
        assert_eq!(format(Money::from_cents(i64::MIN)), "-R$ 92.233.720.368.547.758,08");
    }

    #[test]
    fn test_format_reais_degrades() {
        assert_eq!(format_reais(1234.5), "R$ 1.234,50");
        assert_eq!(format_reais(f64::NAN), "R$ 0,00");
        assert_eq!(format_reais(f64::INFINITY), "R$ 0,00");
    }

    #[test]
    fn test_round_trip() {
        for cents in [0, 1, 9, 10, 99, 100, 101, 99_999, 100_000, 123_456_789, -1, -123_456] {
            let money = Money::from_cents(cents);
            assert_eq!(parse(&format(money)), money, "cents: {cents}");
        }
    }

    #[test]
    fn test_round_trip_at_limits() {
        for cents in [i64::MAX, -i64::MAX] {
            let money = Money::from_cents(cents);
            assert_eq!(parse(&format(money)), money, "cents: {cents}");
        }
        assert_eq!(parse(&format(Money::from_cents(i64::MIN))), Money::zero());
    }

    #[test]
    fn test_mask_keystroke() {
        assert_eq!(mask_keystroke(""), "R$ 0,00");
        assert_eq!(mask_keystroke("1"), "R$ 0,01");
        assert_eq!(mask_keystroke("123456"), "R$ 1.234,56");
        assert_eq!(mask_keystroke("R$ 0,012"), "R$ 0,12");
    }

    #[test]
    fn test_validate() {
        let negative = Money::from_cents(-1);
        assert!(validate(negative, SignPolicy::Signed).is_ok());
        assert!(matches!(
            validate(negative, SignPolicy::NonNegative),
            Err(CoreError::InvalidAmount { .. })
        ));

        assert!(validate(Money::zero(), SignPolicy::NonNegative).is_ok());
        assert!(matches!(
            validate(Money::zero(), SignPolicy::Positive),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(validate(Money::from_cents(1), SignPolicy::Positive).is_ok());
    }

    #[test]
    fn test_validate_reais() {
        assert_eq!(
            validate_reais(10.5, SignPolicy::Positive).unwrap().cents(),
            1_050
        );
        assert!(validate_reais(f64::NAN, SignPolicy::Signed).is_err());
        assert!(validate_reais(f64::NEG_INFINITY, SignPolicy::Signed).is_err());
        assert!(validate_reais(-0.01, SignPolicy::NonNegative).is_err());
    }

    #[test]
    fn test_monetary_amount() {
        let mut field = MonetaryAmount::from_input("1.000,00");
        assert_eq!(field.amount().cents(), 100_000);
        assert_eq!(field.display(), "R$ 1.000,00");

        field.set_input("abc");
        assert_eq!(field.amount(), Money::zero());
        assert_eq!(field.raw_input(), "abc");

        let persisted = MonetaryAmount::from_money(Money::from_cents(4_990));
        assert_eq!(persisted.raw_input(), "R$ 49,90");
        assert_eq!(parse(persisted.raw_input()), persisted.amount());

        field.reset();
        assert_eq!(field, MonetaryAmount::default());
    }
}
