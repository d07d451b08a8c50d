use anyhow::bail;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

/// Represents an amount of money in USD currency.
///
/// The amount is stored as a [`Decimal`], so prices keep every digit given in
/// the sales data. Totals computed with [`Usd::checked_mul`] are rounded to
/// whole cents, half away from zero. The [`Display`] implementation renders
/// the amount the way the spreadsheet's `$#,##0.00` number format does.
///
/// ```
/// # use order_report::Usd;
/// let price: Usd = "$1,234.5".parse().unwrap();
/// assert_eq!(price, Usd::from_cents(123_450));
/// assert_eq!(price.to_string(), "$1,234.50");
/// assert_eq!(price.checked_mul(2).unwrap().to_string(), "$2,469.00");
/// ```
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(Decimal);

impl Usd {
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Returns the amount in dollars, for writing as a spreadsheet number.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns the price of `qty` units at this unit price, rounded to whole
    /// cents, or `None` if the result is out of range.
    #[must_use]
    pub fn checked_mul(self, qty: u32) -> Option<Self> {
        let total = self.0.checked_mul(Decimal::from(qty))?;
        Some(Self(total.round_dp_with_strategy(
            2,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// Returns the sum of two amounts, or `None` if it is out of range.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let digits = format!("{:.2}", rounded.abs());
        let (dollars, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, digit) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{sign}${grouped}.{cents}")
    }
}

impl FromStr for Usd {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let digits = unsigned.strip_prefix('$').unwrap_or(unsigned).replace(',', "");
        let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        if whole.is_empty() && frac.is_empty() {
            bail!("{s:?} is not an amount");
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            bail!("{s:?} is not an amount");
        }
        let whole = if whole.is_empty() { "0" } else { whole };
        let text = if frac.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{frac}")
        };
        let amount = Decimal::from_str(&text)
            .map_err(|e| anyhow::anyhow!("{s:?} is not an amount: {e}"))?;
        Ok(Self(if negative { -amount } else { amount }))
    }
}
