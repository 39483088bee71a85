//! The expense model and the validation applied before an expense is stored.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::Date;

use crate::{
    Error,
    budget::MAX_AMOUNT,
    category::{Category, auto_categorize},
    database_id::ExpenseId,
};

/// Money spent on something, e.g. a food delivery or an electricity bill.
///
/// Expenses are only ever created by a store from a validated [NewExpense],
/// which is where the id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense, unique within its store.
    pub id: ExpenseId,
    /// The merchant or source of the expense, e.g. "Swiggy".
    pub platform: String,
    /// The category the expense is filed under.
    #[serde(default)]
    pub category: Category,
    /// How much was spent.
    ///
    /// Amounts that are missing or not numeric in stored data are read as zero.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub amount: Decimal,
    /// The day the money was spent.
    pub date: Date,
    /// Kept so stored data round-trips; nothing reads or writes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
}

/// A validated expense that has not been assigned an ID yet.
///
/// To create a `NewExpense`, use [NewExpense::new].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    platform: String,
    category: Category,
    amount: Decimal,
    date: Date,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// The platform is trimmed. If `category` is `None`, the category is
    /// guessed from the platform with [auto_categorize].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyPlatform] if `platform` is empty or only whitespace,
    /// - [Error::NonPositiveAmount] if `amount` is zero or negative,
    /// - or [Error::AmountTooLarge] if `amount` is greater than [MAX_AMOUNT].
    pub fn new(
        platform: &str,
        category: Option<Category>,
        amount: Decimal,
        date: Date,
    ) -> Result<Self, Error> {
        let platform = platform.trim();

        if platform.is_empty() {
            return Err(Error::EmptyPlatform);
        }

        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(amount));
        }

        if amount > MAX_AMOUNT {
            return Err(Error::AmountTooLarge(amount));
        }

        let category = category.unwrap_or_else(|| auto_categorize(platform));

        Ok(Self {
            platform: platform.to_owned(),
            category,
            amount,
            date,
        })
    }

    /// The trimmed, non-empty platform name.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The chosen or auto-assigned category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The amount, always greater than zero.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The day the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Attach an ID, producing the stored form of the expense.
    pub(crate) fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            platform: self.platform,
            category: self.category,
            amount: self.amount,
            date: self.date,
            is_recurring: None,
        }
    }
}

/// Parse an amount from stored data, falling back to zero.
fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.as_ref().and_then(parse_amount).unwrap_or_default())
}

/// Read an amount from a JSON number or a numeric string.
pub(crate) fn parse_amount(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_owned(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
