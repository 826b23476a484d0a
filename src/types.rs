use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops;

use crate::constants::*;
use crate::errors::*;

pub use rust_decimal::prelude::Zero;
use rust_decimal::prelude::ToPrimitive;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CurrencyCode([u8; 3]);

/// A monetary amount at the backend's currency scale (two decimal places).
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Money(Decimal);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CategoryId(pub i64);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TransactionId(pub i64);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct BudgetId(pub i64);

/// One calendar month of a Gregorian year, the scope of a budget.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MonthPeriod {
    month: u32,
    year: i32,
}

impl CurrencyCode {
    pub fn from_str(code: &str) -> Result<CurrencyCode> {
        match code.as_bytes() {
            [a, b, c] => Ok(CurrencyCode([*a, *b, *c])),
            _ => bail!("Invalid currency code: {}", code),
        }
    }

    pub fn to_str(&self) -> Cow<str> {
        // Safe to use 'from_utf8_lossy', since we know our bytes
        // originally came from a 'String'.
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<CurrencyCode, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CurrencyCode::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

impl Money {
    const SCALE: u32 = 2;

    pub fn from_scaled_i64(value: i64) -> Money {
        Money(Decimal::new(value, Self::SCALE))
    }

    pub fn to_scaled_i64(self) -> i64 {
        assert!(
            self.0.scale() == Self::SCALE,
            "Money Decimal scale should be {}, but is {}",
            Self::SCALE,
            self.0.scale()
        );
        let mut result = self.0;
        result
            .set_scale(0)
            .expect("Money Decimal scale should be settable to 0");
        result
            .to_i64()
            .expect("Money Decimal should be convertible to i64")
    }

    pub fn from_decimal(value: Decimal) -> Money {
        let mut result =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::BankersRounding);
        let scale_difference = Self::SCALE as i32 - result.scale() as i32;
        if scale_difference > 0 {
            result *= Decimal::new(10i64.pow(scale_difference as u32), 0);
            result
                .set_scale(Self::SCALE)
                .unwrap_or_else(|_| panic!("Money scale should be settable to {}", Self::SCALE));
        }
        Money(result)
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Money {
        let result = Money(self.0.abs());
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::zero()
    }
}

impl ops::Add for Money {
    type Output = Money;
    fn add(self, other: Money) -> Money {
        let result = Money(self.0 + other.0);
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
        assert_eq!(self.0.scale(), Self::SCALE);
    }
}

impl ops::Sub for Money {
    type Output = Money;
    fn sub(self, other: Money) -> Money {
        let result = Money(self.0 - other.0);
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl ops::SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
        assert_eq!(self.0.scale(), Self::SCALE);
    }
}

impl ops::Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        let result = Money(self.0.neg());
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl Zero for Money {
    fn zero() -> Money {
        Money::from_scaled_i64(0)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Money, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Money::from_decimal(
            <Decimal as Deserialize>::deserialize(deserializer)?,
        ))
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // The backend's decimal fields accept and emit strings.
        serializer.serialize_str(&self.0.to_string())
    }
}

impl MonthPeriod {
    pub fn new(month: u32, year: i32) -> Result<MonthPeriod> {
        ensure!(
            (1..=12).contains(&month),
            format!("Month must be between 1 and 12, got {}", month)
        );
        Ok(MonthPeriod { month, year })
    }

    pub fn from_date(date: NaiveDate) -> MonthPeriod {
        MonthPeriod {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn previous(self) -> MonthPeriod {
        if self.month == 1 {
            MonthPeriod {
                month: 12,
                year: self.year - 1,
            }
        } else {
            MonthPeriod {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn abbreviation(self) -> &'static str {
        MONTH_ABBREVIATIONS[(self.month - 1) as usize]
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.abbreviation(), self.year)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BudgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
