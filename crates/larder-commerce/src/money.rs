//! Money type for representing monetary values.
//!
//! Amounts are integer minor units (cents). Anything involving a rate or a
//! ratio goes through [`Decimal`] and is rounded exactly once, half away
//! from zero, back to the currency's minor unit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    ARS,
    USD,
    EUR,
    GBP,
    JPY,
    BRL,
    CLP,
    UYU,
    MXN,
}

impl Currency {
    /// Get the currency code (e.g., "ARS").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::ARS => "ARS",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::BRL => "BRL",
            Currency::CLP => "CLP",
            Currency::UYU => "UYU",
            Currency::MXN => "MXN",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::ARS | Currency::USD | Currency::CLP => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::BRL => "R$",
            Currency::UYU => "$U",
            Currency::MXN => "MX$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY | Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Thousands and decimal separators used when displaying amounts.
    pub fn separators(&self) -> (char, char) {
        match self {
            Currency::USD | Currency::GBP | Currency::JPY | Currency::MXN => (',', '.'),
            _ => ('.', ','),
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "ARS" => Some(Currency::ARS),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "BRL" => Some(Currency::BRL),
            "CLP" => Some(Currency::CLP),
            "UYU" => Some(Currency::UYU),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., centavos
/// for ARS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from whole major units.
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Self::new(amount * currency.minor_per_major(), currency)
    }

    /// Create a Money value from a decimal amount in major units.
    ///
    /// Rounds half away from zero to the currency's minor unit. Returns
    /// `None` if the amount doesn't fit.
    ///
    /// ```
    /// use larder_commerce::money::{Currency, Money};
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_decimal(Decimal::new(49995, 3), Currency::ARS).unwrap();
    /// assert_eq!(price.amount_cents, 5000);
    /// ```
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Option<Self> {
        let scaled = amount.checked_mul(Decimal::from(currency.minor_per_major()))?;
        let cents = scaled
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()?;
        Some(Self::new(cents, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Convert to a decimal value in major units.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount_cents, self.currency.decimal_places())
    }

    /// Format as a display string (e.g., "$1.234,56").
    pub fn display(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        format!("{}{}{}", sign, self.currency.symbol(), self.display_amount())
    }

    /// Format the absolute amount without symbol (e.g., "1.234,56").
    pub fn display_amount(&self) -> String {
        let (thousands, decimal) = self.currency.separators();
        let per_major = self.currency.minor_per_major().unsigned_abs();
        let abs = self.amount_cents.unsigned_abs();

        let whole = group_digits(abs / per_major, thousands);
        let places = self.currency.decimal_places() as usize;
        if places == 0 {
            return whole;
        }
        format!("{}{}{:0places$}", whole, decimal, abs % per_major)
    }

    /// Try to add another Money value, returning None if currencies don't match
    /// or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_cents.checked_add(other.amount_cents)?,
            self.currency,
        ))
    }

    /// Multiply by an integer quantity with overflow checking.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        Some(Money::new(
            self.amount_cents.checked_mul(factor)?,
            self.currency,
        ))
    }

    /// Scale by `numerator / denominator`, rounding once to the minor unit.
    ///
    /// Returns `None` for a zero denominator or on overflow.
    pub fn try_scale(&self, numerator: i64, denominator: i64) -> Option<Money> {
        if denominator == 0 {
            return None;
        }
        let scaled = Decimal::from(self.amount_cents)
            .checked_mul(Decimal::from(numerator))?
            .checked_div(Decimal::from(denominator))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()?;
        Some(Money::new(scaled, self.currency))
    }

    /// Sum an iterator of Money values, failing on currency mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major() {
        let m = Money::from_major(30, Currency::ARS);
        assert_eq!(m.amount_cents, 3000);

        let m = Money::from_major(100, Currency::JPY);
        assert_eq!(m.amount_cents, 100);
    }

    #[test]
    fn test_money_from_decimal_rounds_half_away_from_zero() {
        let m = Money::from_decimal(Decimal::new(12345, 3), Currency::ARS).unwrap();
        assert_eq!(m.amount_cents, 1235);

        let m = Money::from_decimal(Decimal::new(-12345, 3), Currency::ARS).unwrap();
        assert_eq!(m.amount_cents, -1235);
    }

    #[test]
    fn test_money_to_decimal() {
        let m = Money::new(4999, Currency::ARS);
        assert_eq!(m.to_decimal(), Decimal::new(4999, 2));
    }

    #[test]
    fn test_money_display_argentine_format() {
        assert_eq!(Money::new(123456, Currency::ARS).display(), "$1.234,56");
        assert_eq!(Money::new(100_000_000, Currency::ARS).display(), "$1.000.000,00");
        assert_eq!(Money::new(5, Currency::ARS).display(), "$0,05");
        assert_eq!(Money::new(-14700, Currency::ARS).display(), "-$147,00");
    }

    #[test]
    fn test_money_display_other_locales() {
        assert_eq!(Money::new(123456, Currency::USD).display(), "$1,234.56");
        assert_eq!(Money::new(1500, Currency::JPY).display(), "\u{00a5}1,500");
    }

    #[test]
    fn test_money_try_add_rejects_mixed_currency() {
        let ars = Money::new(1000, Currency::ARS);
        let usd = Money::new(1000, Currency::USD);
        assert!(ars.try_add(&usd).is_none());
        assert_eq!(ars.try_add(&ars).unwrap().amount_cents, 2000);
    }

    #[test]
    fn test_money_try_add_overflow() {
        let big = Money::new(i64::MAX, Currency::ARS);
        assert!(big.try_add(&Money::new(1, Currency::ARS)).is_none());
    }

    #[test]
    fn test_money_try_scale() {
        // 60.00 per hundred, 245 grams
        let per_hundred = Money::new(6000, Currency::ARS);
        assert_eq!(per_hundred.try_scale(245, 100).unwrap().amount_cents, 14700);

        // 33.33 * 25 / 100 = 8.3325 -> 8.33
        let odd = Money::new(3333, Currency::ARS);
        assert_eq!(odd.try_scale(25, 100).unwrap().amount_cents, 833);

        assert!(odd.try_scale(1, 0).is_none());
    }

    #[test]
    fn test_money_try_sum() {
        let items = [Money::new(100, Currency::ARS), Money::new(250, Currency::ARS)];
        let total = Money::try_sum(items.iter(), Currency::ARS).unwrap();
        assert_eq!(total.amount_cents, 350);

        let empty: [Money; 0] = [];
        assert!(Money::try_sum(empty.iter(), Currency::ARS).unwrap().is_zero());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("ARS"), Some(Currency::ARS));
        assert_eq!(Currency::from_code(" eur "), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
