//! Expense categories and keyword-based auto-categorization.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The fixed set of labels an expense can be filed under.
///
/// Categories are ordered by their label, so a `BTreeMap<Category, _>`
/// iterates in the same lexicographic order the dashboard list and the chart
/// legend are rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Entertainment,
    Food,
    Shopping,
    Transport,
    Bills,
    Subscriptions,
    Healthcare,
    Education,
    #[default]
    Other,
}

impl Category {
    /// Every category, in the order they are offered in the expense form.
    pub const ALL: [Category; 9] = [
        Category::Entertainment,
        Category::Food,
        Category::Shopping,
        Category::Transport,
        Category::Bills,
        Category::Subscriptions,
        Category::Healthcare,
        Category::Education,
        Category::Other,
    ];

    /// The display label, e.g. "Food".
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Subscriptions => "Subscriptions",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;

        label
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// Lowercase keywords and the category they imply.
///
/// Entries are checked in order and the first hit wins, so a platform such as
/// "Amazon Prime" lands in [Category::Entertainment] because "prime" is listed
/// before "amazon".
pub const CATEGORY_KEYWORDS: [(&str, Category); 21] = [
    ("netflix", Category::Entertainment),
    ("spotify", Category::Entertainment),
    ("prime", Category::Entertainment),
    ("hotstar", Category::Entertainment),
    ("youtube", Category::Entertainment),
    ("zomato", Category::Food),
    ("swiggy", Category::Food),
    ("uber", Category::Transport),
    ("ola", Category::Transport),
    ("amazon", Category::Shopping),
    ("flipkart", Category::Shopping),
    ("myntra", Category::Shopping),
    ("electricity", Category::Bills),
    ("water", Category::Bills),
    ("internet", Category::Bills),
    ("mobile", Category::Bills),
    ("gym", Category::Subscriptions),
    ("hospital", Category::Healthcare),
    ("pharmacy", Category::Healthcare),
    ("udemy", Category::Education),
    ("coursera", Category::Education),
];

/// Guess the category of an expense from its platform name.
///
/// Returns the category of the first keyword in [CATEGORY_KEYWORDS] that
/// appears anywhere in `platform` (ignoring case), or [Category::Other] if
/// none do.
pub fn auto_categorize(platform: &str) -> Category {
    let platform = platform.to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| platform.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or_default()
}

#[cfg(test)]
mod auto_categorize_tests {
    use super::{Category, auto_categorize};

    #[test]
    fn matches_keyword_ignoring_case() {
        assert_eq!(auto_categorize("Netflix Premium"), Category::Entertainment);
        assert_eq!(auto_categorize("ZOMATO order"), Category::Food);
        assert_eq!(auto_categorize("Coursera Plus"), Category::Education);
    }

    #[test]
    fn falls_back_to_other() {
        assert_eq!(auto_categorize("Random Store"), Category::Other);
        assert_eq!(auto_categorize(""), Category::Other);
    }

    #[test]
    fn first_keyword_in_table_wins() {
        // "prime" comes before "amazon" in the table.
        assert_eq!(auto_categorize("Amazon Prime Video"), Category::Entertainment);
        // "uber" comes before "ola", and both appear in "Uber Ola".
        assert_eq!(auto_categorize("Uber Ola"), Category::Transport);
    }

    #[test]
    fn matches_substrings_inside_words() {
        // "ola" is a substring of "Coca-Cola".
        assert_eq!(auto_categorize("Coca-Cola"), Category::Transport);
        assert_eq!(auto_categorize("Mineral water"), Category::Bills);
    }
}
