use std::fmt::{Debug, Display, Formatter};
use std::ops;
use std::str::FromStr;

use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub type Figure = Decimal;

// Every amount handled by the back office is in euro
pub const CURRENCY_SIGN: &str = "€";

/// A euro amount.
///
/// The figure is kept exact; rounding to cents only happens when the amount is rendered.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    figure: Figure,
}

impl Money {
    pub fn new(figure: Figure) -> Money {
        Money { figure }
    }

    pub fn zero() -> Money {
        Money::new(Decimal::ZERO)
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn rounded(&self) -> Figure {
        self.figure
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
    }

    pub fn scale(&self, rate: Figure) -> Money {
        Money::new(self.figure * rate)
    }

    pub fn from_raw(raw: Option<&RawAmount>, convention: NumberConvention) -> Money {
        Money::new(normalize_amount(raw, convention))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", CURRENCY_SIGN, self.rounded())
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Debug keeps the exact figure so test failures show what was really computed
        write!(f, "{}{}", CURRENCY_SIGN, self.figure)
    }
}

impl Money {
    /// None when the sum does not fit in a figure
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.figure.checked_add(other.figure).map(Money::new)
    }
}

impl ops::Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.figure + other.figure)
    }
}

impl ops::Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.figure - other.figure)
    }
}

/// Which characters separate thousands and decimals in a textual amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NumberConvention {
    /// "1.234,56": dots group thousands, the comma starts the decimals
    #[default]
    German,
    /// "1,234.56": commas group thousands, the dot starts the decimals
    Plain,
}

/// An amount as it is found in stored records: a JSON number or free text such as "€ 1.234,56".
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    /// Stored form of an amount: the exact figure as text, with the decimal separator of
    /// `convention` and no thousands separators.
    pub fn from_money(money: &Money, convention: NumberConvention) -> RawAmount {
        let figure = money.figure().to_string();
        RawAmount::Text(match convention {
            NumberConvention::German => figure.replace('.', ","),
            NumberConvention::Plain => figure,
        })
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Number(serde_json::Number::from(value))
    }
}

/// Turns a stored amount into a figure. Never fails: anything unreadable is worth zero.
///
/// Numbers pass through untouched. Text is stripped of everything but digits, `.`, `,` and `-`,
/// the thousands separators of `convention` are dropped and the decimal separator becomes a dot.
///
/// Under [`NumberConvention::German`] a plain string like "1234.56" reads as 123456. That is the
/// historical behaviour of the German path and callers pick the convention matching their data.
pub fn normalize_amount(input: Option<&RawAmount>, convention: NumberConvention) -> Figure {
    match input {
        None => Decimal::ZERO,
        Some(RawAmount::Number(number)) => figure_from_number(number),
        Some(RawAmount::Text(text)) => figure_from_text(text, convention),
    }
}

fn figure_from_number(number: &serde_json::Number) -> Figure {
    let repr = number.to_string();
    Decimal::from_str(&repr)
        .or_else(|_| Decimal::from_scientific(&repr))
        .unwrap_or(Decimal::ZERO)
}

fn figure_from_text(text: &str, convention: NumberConvention) -> Figure {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    let canonical = match convention {
        NumberConvention::German => kept.replace('.', "").replace(',', "."),
        NumberConvention::Plain => kept.replace(',', ""),
    };

    leading_number(&canonical)
        .and_then(|number| Decimal::from_str(&number).ok())
        .unwrap_or(Decimal::ZERO)
}

// Reads the longest "-123.45" shaped prefix, ignoring whatever trails it ("1.2.3" reads as 1.2)
fn leading_number(text: &str) -> Option<String> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let integer: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let after_integer = &rest[integer.len()..];
    let decimals: String = after_integer
        .strip_prefix('.')
        .map(|decimals| decimals.chars().take_while(|c| c.is_ascii_digit()).collect())
        .unwrap_or_default();

    if integer.is_empty() && decimals.is_empty() {
        return None;
    }

    let integer = if integer.is_empty() { "0".to_string() } else { integer };
    let sign = if negative { "-" } else { "" };
    if decimals.is_empty() {
        Some(format!("{}{}", sign, integer))
    } else {
        Some(format!("{}{}.{}", sign, integer, decimals))
    }
}

#[cfg(test)]
impl Money {
    pub fn euro(figure: &str) -> Money {
        Money::new(Decimal::from_str_exact(figure).expect("can build a decimal from passed string"))
    }
}
