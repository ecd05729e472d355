//! Prices in integer minor currency units.
//!
//! The REST API stores every price as an integer number of centavos. Forms
//! show prices in reais with a comma decimal separator (`"12,50"`), and
//! listings show them as Brazilian currency (`"R$ 12,50"`). [`Price`] owns both
//! conversions so that a value loaded into a form and saved back unchanged
//! round-trips to the same integer.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors produced when parsing a price typed into a form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Nothing was typed.
    #[error("Digite o preço do produto")]
    Empty,
    /// The input is not a number, or is zero or negative.
    #[error("Digite um valor válido e positivo")]
    NotPositive,
}

/// A price in centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero reais.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in centavos.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in centavos.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, saturating on overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Parse a price typed by a user, in reais.
    ///
    /// Accepts either `,` or `.` as the decimal separator, converts to
    /// centavos by rounding `value * 100` half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Empty`] for blank input and
    /// [`PriceError::NotPositive`] for anything that is not a number greater
    /// than zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use devburger_core::Price;
    ///
    /// assert_eq!(Price::parse_input("12,50").unwrap().cents(), 1250);
    /// assert_eq!(Price::parse_input("0.999").unwrap().cents(), 100);
    /// assert!(Price::parse_input("0").is_err());
    /// assert!(Price::parse_input("-3,00").is_err());
    /// ```
    pub fn parse_input(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let normalized = trimmed.replacen(',', ".", 1);
        let value: Decimal = normalized.parse().map_err(|_| PriceError::NotPositive)?;
        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PriceError::NotPositive)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(PriceError::NotPositive)?;

        // 0,001 rounds down to nothing
        if cents <= 0 {
            return Err(PriceError::NotPositive);
        }

        Ok(Self(cents))
    }

    /// The value to prefill a price input with: reais, two decimals, comma
    /// separator (`1250` -> `"12,50"`).
    #[must_use]
    pub fn to_input(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{},{:02}", abs / 100, abs % 100)
    }

    /// Format as Brazilian currency (`123450` -> `"R$ 1.234,50"`).
    #[must_use]
    pub fn display(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!(
            "{sign}R$ {},{:02}",
            group_thousands(abs / 100),
            abs % 100
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

/// Insert `.` thousands separators.
fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(".")
}
