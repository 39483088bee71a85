//! The monthly spending limit and the calendar month used to filter expenses.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::Error;

/// The largest amount accepted for an expense or a monthly limit: 1,000,000,000.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// The most a user intends to spend in a calendar month.
///
/// A limit is never negative. Zero is allowed and means "no budget".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MonthlyLimit(Decimal);

impl MonthlyLimit {
    /// The limit used until the user sets one: 50,000.
    pub const DEFAULT: MonthlyLimit = MonthlyLimit(Decimal::from_parts(50_000, 0, 0, false, 0));

    /// Create a monthly limit.
    ///
    /// # Errors
    /// Returns [Error::NegativeLimit] if `amount` is less than zero, or
    /// [Error::AmountTooLarge] if it is greater than [MAX_AMOUNT].
    pub fn new(amount: Decimal) -> Result<Self, Error> {
        if amount < Decimal::ZERO {
            return Err(Error::NegativeLimit(amount));
        }

        if amount > MAX_AMOUNT {
            return Err(Error::AmountTooLarge(amount));
        }

        Ok(Self(amount))
    }

    /// The limit as a plain number.
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl Default for MonthlyLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<Decimal> for MonthlyLimit {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthlyLimit> for Decimal {
    fn from(limit: MonthlyLimit) -> Self {
        limit.0
    }
}

impl Display for MonthlyLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar month in a particular year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a year-month from a year and a month number from 1 to 12.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        Ok(Self { year, month })
    }

    /// The year-month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month before this one, rolling over to December of the previous year.
    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// The month after this one, rolling over to January of the next year.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}
