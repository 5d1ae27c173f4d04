//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so every amount is quantized to
//! two decimals by construction. Conversions from [`Decimal`] round
//! half away from zero, the one rounding rule used across the crate.
//!
//! Parsed amounts are bounded by [`Money::MAX_AMOUNT`], so sums over any
//! realistic number of bills and shares stay far inside `i64`. Arithmetic
//! saturates at the `i64` cent range instead of overflowing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Rounding applied whenever a decimal value is quantized to cents
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from user input: 10 trillion units
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use household_cli::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Whether the magnitude is within [`MAX_AMOUNT`](Self::MAX_AMOUNT)
    pub const fn is_within_limit(&self) -> bool {
        self.0.unsigned_abs() <= Self::MAX_AMOUNT.0.unsigned_abs()
    }

    /// Quantize a decimal value to cents, rounding half away from zero
    ///
    /// Returns `None` if the value does not fit in the cent range.
    ///
    /// # Examples
    /// ```
    /// use household_cli::models::Money;
    /// use rust_decimal::Decimal;
    /// let amount = Money::from_decimal(Decimal::new(10005, 3)).unwrap(); // 10.005
    /// assert_eq!(amount.cents(), 1001);
    /// ```
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, ROUNDING);
        cents.to_i64().map(Self)
    }

    /// Exact decimal value with two fractional digits
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Strictly parse a plain decimal amount such as `"10.50"`, `"-3"` or `"0.005"`
    ///
    /// Extra fractional digits are rounded half away from zero. Amounts
    /// beyond [`MAX_AMOUNT`](Self::MAX_AMOUNT) are out of range.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| MoneyParseError::InvalidFormat(trimmed.to_string()))?;
        Self::from_decimal(value)
            .filter(Self::is_within_limit)
            .ok_or_else(|| MoneyParseError::OutOfRange(trimmed.to_string()))
    }

    /// Parse free-form user input, falling back to zero
    ///
    /// Keeps digits, `.`, `,` and a `-` seen before the first digit. When both
    /// separators appear, the one occurring last is the decimal separator; a
    /// separator repeated on its own is a thousands separator. Amounts
    /// beyond [`MAX_AMOUNT`](Self::MAX_AMOUNT) count as zero.
    ///
    /// # Examples
    /// ```
    /// use household_cli::models::Money;
    /// assert_eq!(Money::parse_lenient("R$ 1.234,56").cents(), 123456);
    /// assert_eq!(Money::parse_lenient("12,5").cents(), 1250);
    /// assert_eq!(Money::parse_lenient("n/a").cents(), 0);
    /// ```
    pub fn parse_lenient(s: &str) -> Self {
        let mut negative = false;
        let mut seen_digit = false;
        let mut kept = String::with_capacity(s.len());

        for c in s.chars() {
            match c {
                '0'..='9' => {
                    seen_digit = true;
                    kept.push(c);
                }
                '.' | ',' => kept.push(c),
                '-' if !seen_digit => negative = true,
                _ => {}
            }
        }

        let normalized = normalize_separators(&kept);
        if !normalized.chars().any(|c| c.is_ascii_digit()) {
            return Self::zero();
        }

        let value = match Decimal::from_str(&normalized) {
            Ok(value) => value,
            Err(_) => return Self::zero(),
        };
        let value = if negative { -value } else { value };

        Self::from_decimal(value)
            .filter(Self::is_within_limit)
            .unwrap_or_default()
    }

    /// Format with a currency symbol, e.g. `R$10.50`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

/// Rewrite the kept digits and separators into `Decimal::from_str` syntax
fn normalize_separators(s: &str) -> String {
    let decimal_at = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(dot), None) if s.matches('.').count() == 1 => Some(dot),
        (None, Some(comma)) if s.matches(',').count() == 1 => Some(comma),
        _ => None,
    };

    let mut out = String::with_capacity(s.len() + 2);
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if Some(i) == decimal_at {
            if out.is_empty() {
                out.push('0');
            }
            out.push('.');
        }
    }
    if out.ends_with('.') {
        out.push('0');
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

/// Fixed-point with exactly two decimals and no currency symbol
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_negative() {
            format!("-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.units(), self.cents_part())
        };
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, factor: i64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for strict money parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyParseError {
    #[error("Invalid money format: {0}")]
    InvalidFormat(String),
    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}
